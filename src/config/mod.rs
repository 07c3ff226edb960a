/// Main configuration module.
///
/// Re-exports submodules for game, server and ledger configuration.
pub mod game;
pub mod ledger;
pub mod server;

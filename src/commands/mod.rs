//! This module aggregates the sound command modules for the bot.

/// The alias → sound table loaded from the commands file.
pub mod command_table;
/// Turns an incoming chat message into a playback request.
pub mod resolver;

use crossterm::style::Color;

pub const FILLER: Color = Color::DarkGrey;
pub const STATUS: Color = Color::AnsiValue(250); // light grey for the status row
pub const DEBUG: Color = Color::AnsiValue(173); // burnt orange for the debug row

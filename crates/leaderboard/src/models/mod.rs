mod player;
mod player_name;

pub use player::Player;
pub use player_name::PlayerName;

pub mod admin_player;
pub mod current_player;
pub mod validated_json;

pub use admin_player::AdminPlayer;
pub use current_player::CurrentPlayer;
pub use validated_json::ValidatedJson;

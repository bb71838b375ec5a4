use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a connected player, assigned at ladder connect time.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlayerInfo {
    pub id: Uuid,
    pub username: String,
}

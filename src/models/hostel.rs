use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Hostel {
    pub id: Option<i64>,
    pub name: String,
    pub location: String,
    pub rooms: i64,
    pub capacity: i64,
}

impl Hostel {
    pub fn new(name: String, location: String, rooms: i64, capacity: i64) -> Self {
        Self {
            id: None,
            name,
            location,
            rooms,
            capacity,
        }
    }
}

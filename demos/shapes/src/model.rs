//! Message and service declarations

use wirekit::prelude::*;

/// A point on the integer grid
#[wire_message]
#[derive(Debug)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

include!(concat!(env!("OUT_DIR"), "/Point.g.rs"));

#[wire_message]
#[derive(Debug)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: Option<String>,
}

include!(concat!(env!("OUT_DIR"), "/Address.g.rs"));

/// Every supported field kind, nested and optional fields included
#[wire_message]
#[derive(Debug)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub age: u32,
    pub balance: i64,
    pub score: f32,
    pub rating: f64,
    pub active: bool,
    pub home: Address,
    pub work: Option<Address>,
    pub last_login: Option<i64>,
    #[wire(number = 20)]
    pub nickname: Option<String>,
    /// Process-local counter, never sent
    #[wire(skip)]
    pub session_hits: u32,
}

include!(concat!(env!("OUT_DIR"), "/User.g.rs"));

/// Published under a different schema name than the struct
#[wire_message(name = "Location")]
#[derive(Debug)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

include!(concat!(env!("OUT_DIR"), "/Location.g.rs"));

/// A message without fields
#[wire_message]
#[derive(Debug)]
pub struct Ping;

include!(concat!(env!("OUT_DIR"), "/Ping.g.rs"));

pub mod geometry {
    use super::Point;
    use wirekit::wire_message;

    #[wire_message]
    #[derive(Debug)]
    pub struct Circle {
        pub center: Point,
        pub radius: f64,
    }

    include!(concat!(env!("OUT_DIR"), "/Circle.g.rs"));
}

/// Derives `Clone` itself, so no unit is generated for it
#[wire_message]
#[derive(Debug, Clone, PartialEq)]
pub struct Legacy {
    pub id: u32,
}

#[wire_service(name = "Directory")]
pub struct UserDirectory;

include!(concat!(env!("OUT_DIR"), "/Directory.g.rs"));

/// Registry of every message in this model
pub fn registry() -> Result<DescriptorRegistry, DescriptorError> {
    let mut registry = DescriptorRegistry::new();
    registry
        .register::<Point>()?
        .register::<Address>()?
        .register::<User>()?
        .register::<GeoPoint>()?
        .register::<Ping>()?
        .register::<geometry::Circle>()?;
    Ok(registry)
}

use wirekit_macros::wire_message;

#[wire_message(name = "Location")]
#[derive(Debug)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    #[wire(number = 5)]
    pub label: Option<String>,
    #[wire(skip)]
    pub cached_hash: u64,
}

fn main() {
    let point = GeoPoint {
        lat: 1.5,
        lon: -2.0,
        label: None,
        cached_hash: 0,
    };
    assert_eq!(point.lat, 1.5);
}

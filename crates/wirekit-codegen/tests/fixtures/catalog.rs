use wirekit::{wire_message, wire_service};

#[wire_message]
#[derive(Debug)]
pub struct Money {
    pub currency: String,
    pub units: i64,
    pub nanos: i32,
}

pub mod items {
    use super::*;

    #[wire_message(name = "CatalogItem")]
    #[derive(Debug)]
    pub struct Item {
        pub sku: u64,
        pub title: String,
        pub price: Money,
        pub discount: Option<Money>,
        pub weight: f32,
        pub in_stock: bool,
        #[wire(number = 20)]
        pub rating: Option<f64>,
        #[wire(skip)]
        pub cached_rank: u32,
    }
}

#[wire_message]
#[derive(Debug)]
pub struct Bundle {
    pub items: Vec<items::Item>,
}

#[wire_message]
#[derive(Debug, Default)]
pub struct Legacy {
    pub id: u32,
}

#[wire_service(name = "CatalogService")]
pub struct Catalog;

use wirekit_macros::wire_service;

#[wire_service]
pub struct Directory;

#[wire_service(name = "Search")]
pub struct SearchService {}

fn main() {
    let _directory = Directory;
    let _search = SearchService {};
}

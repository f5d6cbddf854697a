// Markers can be referenced by path and on empty messages

#[wire_macros_alias::wire_message]
pub struct Empty {}

mod wire_macros_alias {
    pub use wirekit_macros::wire_message;
}

fn main() {
    let _empty = Empty {};
}

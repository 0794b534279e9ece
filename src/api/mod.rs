pub mod endpoints;
pub mod exchange;
pub mod recognizer;

pub use endpoints::WireResponse;
pub use exchange::SignExchange;
pub use recognizer::SignRecognizer;

//! Test fixtures and data factories

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;

/// Input for one client insert
#[derive(Debug, Clone)]
pub struct ClientInput {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Create a client input with random realistic values
pub fn client_input() -> ClientInput {
    ClientInput {
        name: Name().fake(),
        email: SafeEmail().fake(),
        phone: PhoneNumber().fake(),
    }
}

/// Create `count` random client inputs
pub fn client_inputs(count: usize) -> Vec<ClientInput> {
    (0..count).map(|_| client_input()).collect()
}

/// The client from the documented example
pub fn ana_silva() -> ClientInput {
    ClientInput {
        name: "Ana Silva".to_string(),
        email: "ana@example.com".to_string(),
        phone: "11999990000".to_string(),
    }
}

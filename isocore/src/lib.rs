// window module
pub mod window {
    pub mod boundary;
    pub mod autofill;
    pub mod export;
}

// data module
pub mod data {
    pub mod target;
}

pub mod error;

use serde::{Serialize, Deserialize};

/// One product row scraped from a listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "Product")]
    pub name: String,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Option<f64>) -> Self {
        Product { name: name.into(), price }
    }
}

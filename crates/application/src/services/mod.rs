mod lookup_classifier;

pub use lookup_classifier::LookupClass;

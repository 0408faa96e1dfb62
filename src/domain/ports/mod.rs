pub mod city_store;
pub mod price_source;

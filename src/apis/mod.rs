// External sources: the reference listing/detail pages and the geocoding services.

pub mod bigdatacloud;
pub mod google;
pub mod locationiq;
pub mod wikipedia;

pub mod calendar_service;
pub mod confirmation;
pub mod conversion;
pub mod extraction_service;
pub mod import_service;
pub mod normalizer;
pub mod openai_service;

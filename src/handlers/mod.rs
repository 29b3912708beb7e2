pub mod http;
pub mod syllabus_flow;

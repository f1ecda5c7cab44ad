pub mod ticket_pipeline;

pub use ticket_pipeline::TicketPipeline;

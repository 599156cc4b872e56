/*!
 * Monitoring Module
 * Structured logging
 */

mod tracer;

pub use tracer::init_tracing;

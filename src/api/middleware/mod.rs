//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. CORS — answers preflight requests before routing
//! 2. Access log — method, path, status and latency of every request

pub mod audit;

pub mod trace_logger;

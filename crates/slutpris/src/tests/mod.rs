mod log_writer;

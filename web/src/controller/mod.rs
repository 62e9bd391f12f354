pub(crate) mod health_check_controller;
pub(crate) mod thing_stream_controller;

pub mod alert_state;
pub mod capture_worker;
pub mod frame_buffer;
pub mod renderer;
pub mod snapshot_throttle;

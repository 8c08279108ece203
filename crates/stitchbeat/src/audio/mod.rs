mod capture;
mod live_input;

pub use capture::AudioCapture;
pub use live_input::LiveInput;

mod app;
mod config;
mod error;
mod library;
mod player;
mod playlist;
mod poller;
mod runtime;
mod ui;
mod youtube;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}

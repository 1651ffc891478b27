mod app;
mod audio;
mod catalog;
mod config;
mod playback;
mod runtime;
mod store;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}

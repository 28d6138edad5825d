use std::process::ExitCode;

use anyhow::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use voice_dialog::console::Console;
use voice_dialog::dialog::Dialog;
use voice_dialog::stt::Session;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(all(windows, feature = "sapi"))]
fn run() -> Result<()> {
    use anyhow::Context;
    use voice_dialog::sapi::{self, SapiRecognizer, SapiSynthesizer};
    use voice_dialog::Error;

    sapi::initialize().context("failed to initialize the speech API")?;
    let outcome = (|| -> Result<()> {
        let voice = SapiSynthesizer::new().map_err(Error::AudioDevice)?;
        let recognizer = SapiRecognizer::new().map_err(Error::AudioDevice)?;
        let mut session = Session::new(recognizer);
        Dialog::new(&mut session, &voice, Console::stdout()).run()?;
        Ok(())
    })();
    sapi::finalize();
    outcome
}

#[cfg(not(all(windows, feature = "sapi")))]
fn run() -> Result<()> {
    use voice_dialog::stt::TextEngine;
    use voice_dialog::tts::MuteSynthesizer;

    let stdin = std::io::stdin();
    let mut session = Session::new(TextEngine::new(stdin.lock()));
    let voice = MuteSynthesizer;
    Dialog::new(&mut session, &voice, Console::stdout()).run()?;
    Ok(())
}

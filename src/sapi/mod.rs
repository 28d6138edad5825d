//! Engines backed by Microsoft's Speech API (SAPI).
//!
//! SAPI is a COM library: [`initialize`] must be called on the thread that creates and uses the
//! engines, and [`finalize`] once they are gone.

use std::ptr::null;

use windows as Windows;
use Windows::Win32::Media::Speech::{
    ISpObjectToken, ISpObjectTokenCategory, SpObjectToken, SpObjectTokenCategory,
};
use Windows::Win32::System::Com::{CoCreateInstance, CoInitialize, CoUninitialize, CLSCTX_ALL};

use crate::stt::EngineError;

mod com;
mod recognizer;
mod synthesizer;

pub use recognizer::SapiRecognizer;
pub use synthesizer::SapiSynthesizer;

const AUDIO_INPUT_CATEGORY: &str = r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Speech\AudioInput";
const AUDIO_OUTPUT_CATEGORY: &str = r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Speech\AudioOutput";

/// Initializes SAPI on the current thread.
pub fn initialize() -> Result<(), EngineError> {
    unsafe { CoInitialize(null()) }.map_err(|err| EngineError::Unavailable(err.to_string()))
}

/// Deinitializes SAPI for the current thread. Must be called once for every successful
/// [`initialize`].
pub fn finalize() {
    unsafe { CoUninitialize() }
}

/// Returns the token of the default device in the given audio category, failing with
/// [`EngineError::DeviceLost`] if the system has none.
fn default_device(category_id: &str) -> Result<ISpObjectToken, EngineError> {
    let lookup = || -> Result<ISpObjectToken, EngineError> {
        let category: ISpObjectTokenCategory =
            unsafe { CoCreateInstance(&SpObjectTokenCategory, None, CLSCTX_ALL) }?;
        unsafe { category.SetId(category_id, false) }?;
        let id = unsafe { com::ComBox::from_raw(category.GetDefaultTokenId()?) };
        let token: ISpObjectToken = unsafe { CoCreateInstance(&SpObjectToken, None, CLSCTX_ALL) }?;
        unsafe { token.SetId(None, *id, false) }?;
        Ok(token)
    };
    lookup().map_err(|err| EngineError::DeviceLost(format!("{}: {}", category_id, err)))
}

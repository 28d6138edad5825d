use tracing::debug;
use windows as Windows;
use Windows::core::IUnknown;
use Windows::Win32::Media::Speech::{
    ISpVoice, SpVoice, SPF_ASYNC, SPF_DEFAULT, SPF_IS_XML, SPF_PARSE_SAPI,
};
use Windows::Win32::System::Com::{CoCreateInstance, CLSCTX_ALL};
use Windows::Win32::System::WindowsProgramming::INFINITE;

use crate::stt::EngineError;
use crate::tts::{Speech, SpeechSynthesizer};

use super::{default_device, AUDIO_OUTPUT_CATEGORY};

/// A synthesizer that renders speech to the default playback device, blocking until done.
pub struct SapiSynthesizer {
    intf: ISpVoice,
}

impl SapiSynthesizer {
    /// Creates the synthesizer. Fails with [`EngineError::DeviceLost`] if there is no default
    /// playback device.
    pub fn new() -> Result<Self, EngineError> {
        let intf: ISpVoice = unsafe { CoCreateInstance(&SpVoice, None, CLSCTX_ALL) }?;
        let output: IUnknown = default_device(AUDIO_OUTPUT_CATEGORY)?.cast()?;
        unsafe { intf.SetOutput(output, true) }?;
        Ok(Self {
            intf,
        })
    }
}

fn flags(speech: &Speech<'_>) -> u32 {
    if speech.is_xml() {
        (SPF_IS_XML.0 | SPF_PARSE_SAPI.0) as u32
    } else {
        SPF_DEFAULT.0 as u32
    }
}

impl SpeechSynthesizer for SapiSynthesizer {
    fn speak(&self, speech: &Speech<'_>) -> Result<(), EngineError> {
        debug!(xml = speech.is_xml(), text = speech.transcript(), "speaking");
        unsafe { self.intf.Speak(speech.contents(), flags(speech) | SPF_ASYNC.0 as u32) }?;
        unsafe { self.intf.WaitUntilDone(INFINITE) }?;
        Ok(())
    }
}

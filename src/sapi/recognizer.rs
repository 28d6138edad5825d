use std::mem::ManuallyDrop;
use std::ptr::{null, null_mut};
use std::time::Duration;

use tracing::{debug, warn};
use windows as Windows;
use Windows::core::{Abi, IUnknown, Interface, Param};
use Windows::Win32::Foundation::PWSTR;
use Windows::Win32::Media::Speech::{
    ISpEventSource, ISpObjectToken, ISpRecoContext, ISpRecoGrammar, ISpRecoResult, ISpRecognizer,
    SpInprocRecognizer, SPEI_RECOGNITION, SPET_LPARAM_IS_OBJECT, SPET_LPARAM_IS_POINTER,
    SPET_LPARAM_IS_STRING, SPET_LPARAM_IS_TOKEN, SPEVENT, SPEVENTENUM, SPEVENTLPARAMTYPE,
    SPGS_DISABLED, SPGS_ENABLED, SPLO_STATIC, SPPHRASE, SPPHRASEPROPERTY, SPPROPERTYINFO,
    SPPR_ALL_ELEMENTS, SPRAF_Active, SPRAF_TopLevel, SPRS_ACTIVE, SPSTATEHANDLE__, SPWT_LEXICAL,
};
use Windows::Win32::System::Com::{
    CoCreateInstance, CLSCTX_ALL, VARIANT, VARIANT_0, VARIANT_0_0, VARIANT_0_0_0,
};
use Windows::Win32::System::Ole::{VT_EMPTY, VT_I4};

use crate::stt::{EngineError, Grammar, RawRecognition, RecognitionEngine, Slot, SlotMatch};

use super::com::{from_wide, next_elem, opt_str_param, out_to_ret, ComBox};
use super::{default_device, AUDIO_INPUT_CATEGORY};

type State = *mut SPSTATEHANDLE__;

const SPRULETRANS_WILDCARD: State = -2isize as State;
const SPRULETRANS_DICTATION: State = -3isize as State;
const TOP_RULE_ID: u32 = 1;

/// A recognition engine running in-process on the default recording device.
pub struct SapiRecognizer {
    _recognizer: ISpRecognizer,
    context: ISpRecoContext,
    events: ISpEventSource,
    loaded: Option<LoadedGrammar>,
}

struct LoadedGrammar {
    intf: ISpRecoGrammar,
    keys: Vec<(String, usize)>,
}

impl SapiRecognizer {
    /// Creates the engine and binds it to the default audio input. Fails with
    /// [`EngineError::DeviceLost`] if there is no default recording device.
    pub fn new() -> Result<Self, EngineError> {
        let recognizer: ISpRecognizer =
            unsafe { CoCreateInstance(&SpInprocRecognizer, None, CLSCTX_ALL) }?;
        let input: IUnknown = default_device(AUDIO_INPUT_CATEGORY)?.cast()?;
        unsafe { recognizer.SetInput(input, false) }?;
        let context = unsafe { recognizer.CreateRecoContext() }?;
        unsafe { context.SetNotifyWin32Event() }?;
        Ok(Self {
            events: context.cast()?,
            context,
            _recognizer: recognizer,
            loaded: None,
        })
    }

    fn next_result(&self) -> Result<Option<ISpRecoResult>, EngineError> {
        while let Some(event) = unsafe { next_elem(&self.events, ISpEventSource::GetEvents) }? {
            if let Some(result) = recognition_of(event)? {
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    fn to_raw(&self, result: &ISpRecoResult) -> Result<RawRecognition, EngineError> {
        let text = span_text(result, SPPR_ALL_ELEMENTS.0 as u32, SPPR_ALL_ELEMENTS.0 as u32)?;
        let phrase = unsafe { ComBox::from_raw(result.GetPhrase()? as *const SPPHRASE) };
        let phrase = unsafe { &**phrase };
        let keys = self.loaded.as_ref().map(|loaded| loaded.keys.as_slice()).unwrap_or(&[]);

        let mut slots = Vec::new();
        let mut next_prop = unsafe { phrase.Base.pProperties.as_ref() };
        while let Some(prop) = next_prop {
            let name = unsafe { from_wide(&prop.pszName) };
            match keys.iter().find(|(key, _)| *key == name) {
                Some((_, node)) => slots.push(SlotMatch {
                    node: *node,
                    text: span_text(result, prop.ulFirstElement, prop.ulCountOfElements)?,
                    choice: choice_index(prop),
                }),
                None => debug!(property = name.as_str(), "ignoring unknown phrase property"),
            }
            next_prop = unsafe { prop.pNextSibling.as_ref() };
        }

        Ok(RawRecognition {
            text,
            confidence: phrase.Base.Rule.SREngineConfidence.clamp(0.0, 1.0),
            slots,
        })
    }
}

impl RecognitionEngine for SapiRecognizer {
    fn load_grammar(&mut self, grammar: &Grammar<'_>) -> Result<(), EngineError> {
        if self.loaded.is_some() {
            return Err(EngineError::Rejected("a grammar is already loaded".to_string()));
        }
        let intf = unsafe { self.context.CreateGrammar(0) }?;
        let keys = build_rule(&intf, grammar)
            .map_err(|err| EngineError::Rejected(format!("{}: {}", grammar.name(), err)))?;
        unsafe { intf.Commit(0) }?;
        unsafe { intf.SetRuleState(None, null_mut(), SPRS_ACTIVE) }?;
        unsafe { intf.SetGrammarState(SPGS_ENABLED) }?;
        self.loaded = Some(LoadedGrammar {
            intf,
            keys,
        });
        Ok(())
    }

    fn attempt_recognize(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<RawRecognition>, EngineError> {
        let mut result = self.next_result()?;
        if result.is_none() {
            let timeout_ms: u32 = timeout.as_millis().try_into().unwrap_or(u32::MAX - 1);
            unsafe { self.context.WaitForNotifyEvent(timeout_ms) }?;
            result = self.next_result()?;
        }
        match result {
            Some(result) => self.to_raw(&result).map(Some),
            None => Ok(None),
        }
    }

    fn unload_all_grammars(&mut self) -> Result<(), EngineError> {
        if let Some(loaded) = self.loaded.take() {
            if let Err(err) = unsafe { loaded.intf.SetGrammarState(SPGS_DISABLED) } {
                warn!(error = %err, "failed to disable grammar before unloading");
            }
        }
        Ok(())
    }
}

/// Builds the grammar as a single top-level rule: a chain of states with one transition per slot.
/// Returns the semantic keys of the named slots with their node positions.
fn build_rule(
    intf: &ISpRecoGrammar,
    grammar: &Grammar<'_>,
) -> Result<Vec<(String, usize)>, EngineError> {
    let flags = (SPRAF_TopLevel.0 | SPRAF_Active.0) as u32;
    let init_state: State = unsafe {
        out_to_ret(|out| {
            intf.GetRule(opt_str_param(Some(grammar.name())).abi(), TOP_RULE_ID, flags, true, out)
        })
    }?;

    let mut keys = Vec::new();
    let mut prev_state = init_state;
    let mut node_iter = grammar.nodes().iter().enumerate().peekable();
    while let Some((index, node)) = node_iter.next() {
        let next_state = if node_iter.peek().is_some() {
            unsafe { out_to_ret(|out| intf.CreateNewState(prev_state, out)) }?
        } else {
            null_mut()
        };
        let key = node.key();
        match node.slot() {
            Slot::Literal(text) => word_arc(intf, prev_state, next_state, text, None)?,
            Slot::ChoiceSet(entries) => {
                for (choice, entry) in entries.iter().enumerate() {
                    let property = key.map(|key| Property::new(key, Some(choice)));
                    word_arc(intf, prev_state, next_state, &entry.spoken, property.as_ref())?;
                }
            }
            Slot::Wildcard => {
                let property = key.map(|key| Property::new(key, None));
                rule_arc(intf, prev_state, next_state, SPRULETRANS_WILDCARD, property.as_ref())?;
            }
            Slot::Dictation => {
                unsafe { intf.LoadDictation(None, SPLO_STATIC) }?;
                let property = key.map(|key| Property::new(key, None));
                rule_arc(intf, prev_state, next_state, SPRULETRANS_DICTATION, property.as_ref())?;
            }
        }
        if let Some(key) = key {
            keys.push((key.to_string(), index));
        }
        prev_state = next_state;
    }
    Ok(keys)
}

fn word_arc(
    intf: &ISpRecoGrammar,
    from_state: State,
    to_state: State,
    text: &str,
    property: Option<&Property>,
) -> Result<(), EngineError> {
    let prop_ptr = property.map(|prop| &prop.info as *const SPPROPERTYINFO).unwrap_or(null());
    unsafe { intf.AddWordTransition(from_state, to_state, text, " ", SPWT_LEXICAL, 1.0, prop_ptr) }?;
    Ok(())
}

fn rule_arc(
    intf: &ISpRecoGrammar,
    from_state: State,
    to_state: State,
    rule_state: State,
    property: Option<&Property>,
) -> Result<(), EngineError> {
    let prop_ptr = property.map(|prop| &prop.info as *const SPPROPERTYINFO).unwrap_or(null());
    unsafe { intf.AddRuleTransition(from_state, to_state, rule_state, 1.0, prop_ptr) }?;
    Ok(())
}

/// A named phrase property. Choice entries carry their index as an integer value.
struct Property<'s> {
    info: SPPROPERTYINFO,
    _name: Param<'s, PWSTR>,
}

impl<'s> Property<'s> {
    fn new(key: &str, choice: Option<usize>) -> Self {
        let name = opt_str_param(Some(key));
        let (vt, value) = match choice {
            Some(choice) => (
                VT_I4.0 as u16,
                VARIANT_0_0_0 {
                    lVal: choice as i32,
                },
            ),
            None => (VT_EMPTY.0 as u16, Default::default()),
        };
        Self {
            info: SPPROPERTYINFO {
                pszName: unsafe { name.abi() },
                vValue: VARIANT {
                    Anonymous: VARIANT_0 {
                        Anonymous: ManuallyDrop::new(VARIANT_0_0 {
                            vt,
                            Anonymous: value,
                            ..Default::default()
                        }),
                    },
                },
                ..Default::default()
            },
            _name: name,
        }
    }
}

fn choice_index(prop: &SPPHRASEPROPERTY) -> Option<usize> {
    let var = unsafe { &prop.vValue.Anonymous.Anonymous };
    if var.vt == VT_I4.0 as u16 {
        usize::try_from(unsafe { var.Anonymous.lVal }).ok()
    } else {
        None
    }
}

fn span_text(result: &ISpRecoResult, first: u32, count: u32) -> Result<String, EngineError> {
    let text = unsafe {
        ComBox::from_raw(out_to_ret(|out| result.GetText(first, count, true, out, null_mut()))?)
    };
    Ok(unsafe { from_wide(&text) })
}

/// Extracts the recognition result from an event, releasing whatever else the event carries.
fn recognition_of(event: SPEVENT) -> Result<Option<ISpRecoResult>, EngineError> {
    let id = SPEVENTENUM(event._bitfield & 0xffff);
    let lparam = event.lParam.0;
    match SPEVENTLPARAMTYPE(event._bitfield >> 16) {
        SPET_LPARAM_IS_OBJECT => {
            let intf = unsafe { IUnknown::from_abi(lparam as _) }?;
            if id == SPEI_RECOGNITION {
                return Ok(Some(intf.cast()?));
            }
        }
        SPET_LPARAM_IS_POINTER => drop(unsafe { ComBox::from_raw(lparam as *const u8) }),
        SPET_LPARAM_IS_STRING => drop(unsafe { ComBox::from_raw(PWSTR(lparam as _)) }),
        SPET_LPARAM_IS_TOKEN => drop(unsafe { ISpObjectToken::from_abi(lparam as _) }?),
        _ => {}
    }
    Ok(None)
}

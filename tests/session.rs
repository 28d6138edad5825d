use std::collections::VecDeque;
use std::time::Duration;

use voice_dialog::stt::{
    EngineError, Grammar, GrammarBuilder, RawRecognition, RecognitionEngine, Session,
    SessionConfig, Slot, SlotMatch,
};
use voice_dialog::Error;

type Outcome = Result<Option<RawRecognition>, EngineError>;

#[derive(Default)]
struct ScriptedEngine {
    outcomes: VecDeque<Outcome>,
    reject_loads: bool,
    failing_unloads: usize,
    idle_when_done: bool,
    loaded: Vec<String>,
    timeouts: Vec<Duration>,
    unloads: usize,
}

impl ScriptedEngine {
    fn new<I: IntoIterator<Item = Outcome>>(outcomes: I) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl RecognitionEngine for ScriptedEngine {
    fn load_grammar(&mut self, grammar: &Grammar<'_>) -> Result<(), EngineError> {
        if self.reject_loads {
            return Err(EngineError::Rejected("unsupported".to_string()));
        }
        self.loaded.push(grammar.name().to_string());
        Ok(())
    }

    fn attempt_recognize(&mut self, timeout: Duration) -> Outcome {
        self.timeouts.push(timeout);
        match self.outcomes.pop_front() {
            Some(outcome) => outcome,
            None if self.idle_when_done => Ok(None),
            None => Err(EngineError::InputClosed),
        }
    }

    fn unload_all_grammars(&mut self) -> Result<(), EngineError> {
        self.unloads += 1;
        if self.failing_unloads > 0 {
            self.failing_unloads -= 1;
            return Err(EngineError::DeviceLost("engine stopped responding".to_string()));
        }
        Ok(())
    }
}

fn grammar(name: &str) -> Grammar<'_> {
    GrammarBuilder::new(name)
        .append(Slot::literal("my name is"))
        .unwrap()
        .append_named("name", Slot::dictation())
        .unwrap()
        .build()
        .unwrap()
}

fn recognition(name: &str) -> RawRecognition {
    RawRecognition {
        text: format!("my name is {}", name),
        confidence: 0.75,
        slots: vec![
            SlotMatch {
                node: 0,
                text: "my name is".to_string(),
                choice: None,
            },
            SlotMatch {
                node: 1,
                text: name.to_string(),
                choice: None,
            },
        ],
    }
}

#[test]
fn test_retries_until_recognized() {
    let engine = ScriptedEngine::new([Ok(None), Ok(None), Ok(None), Ok(Some(recognition("Sam")))]);
    let config = SessionConfig::default().with_attempt_timeout(Duration::from_millis(300));
    let mut session = Session::with_config(engine, config);

    let phrase = session.listen(&grammar("name")).unwrap();

    assert_eq!("my name is Sam", phrase.text);
    assert_eq!(0.75, phrase.confidence);
    assert_eq!("Sam", phrase.semantics["name"]);
    assert_eq!(vec![Duration::from_millis(300); 4], session.engine().timeouts);
    assert_eq!(1, session.engine().unloads);
    assert_eq!(None, session.active_grammar());
}

#[test]
fn test_engine_failure_unloads_grammar() {
    let engine = ScriptedEngine::new([
        Ok(None),
        Err(EngineError::DeviceLost("microphone unplugged".to_string())),
    ]);
    let mut session = Session::new(engine);

    let err = session.listen(&grammar("name")).unwrap_err();

    assert!(matches!(err, Error::RecognitionEngine(EngineError::DeviceLost(_))));
    assert_eq!(1, session.engine().unloads);
    assert_eq!(None, session.active_grammar());
}

#[test]
fn test_one_grammar_at_a_time() {
    let mut session = Session::new(ScriptedEngine::default());
    session.load(&grammar("first")).unwrap();

    match session.load(&grammar("second")) {
        Err(Error::GrammarAlreadyLoaded {
            active,
            requested,
        }) => {
            assert_eq!("first", active);
            assert_eq!("second", requested);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(vec!["first".to_string()], session.engine().loaded);
    assert_eq!(Some("first"), session.active_grammar());

    session.unload().unwrap();
    session.load(&grammar("second")).unwrap();
    assert_eq!(Some("second"), session.active_grammar());
}

#[test]
fn test_rejected_grammar() {
    let engine = ScriptedEngine {
        reject_loads: true,
        ..Default::default()
    };
    let mut session = Session::new(engine);

    let err = session.listen(&grammar("name")).unwrap_err();

    assert!(matches!(
        err,
        Error::GrammarLoad { ref grammar, source: EngineError::Rejected(_) } if grammar == "name"
    ));
    assert!(session.engine().timeouts.is_empty());
    assert_eq!(None, session.active_grammar());
}

#[test]
fn test_failed_unload_forgets_grammar() {
    let engine = ScriptedEngine {
        failing_unloads: 1,
        ..ScriptedEngine::new([Ok(Some(recognition("Sam"))), Ok(Some(recognition("Kim")))])
    };
    let mut session = Session::new(engine);

    let err = session.listen(&grammar("first")).unwrap_err();
    assert!(matches!(err, Error::RecognitionEngine(EngineError::DeviceLost(_))));
    assert_eq!(None, session.active_grammar());

    let phrase = session.listen(&grammar("second")).unwrap();
    assert_eq!("Kim", phrase.semantics["name"]);
}

#[test]
fn test_consecutive_turns() {
    let engine = ScriptedEngine::new([Ok(Some(recognition("Sam"))), Ok(Some(recognition("Kim")))]);
    let mut session = Session::new(engine);

    let first = session.listen(&grammar("first")).unwrap();
    let second = session.listen(&grammar("second")).unwrap();

    assert_eq!("Sam", first.semantics["name"]);
    assert_eq!("Kim", second.semantics["name"]);
    assert_eq!(vec!["first".to_string(), "second".to_string()], session.engine().loaded);
    assert_eq!(2, session.engine().unloads);
}

#[cfg(feature = "tokio-stt")]
mod async_session {
    use voice_dialog::tokio::AsyncSession;

    use super::*;

    #[tokio::test]
    async fn test_polls_without_blocking() {
        let engine = ScriptedEngine::new([Ok(None), Ok(None), Ok(Some(recognition("Sam")))]);
        let config = SessionConfig::default().with_poll_interval(Duration::from_millis(1));
        let mut session = AsyncSession::new(engine, config);

        let phrase = session.listen(&grammar("name")).await.unwrap();

        assert_eq!("Sam", phrase.semantics["name"]);
        assert_eq!(vec![Duration::ZERO; 3], session.engine().timeouts);
        assert_eq!(None, session.active_grammar());
    }

    #[tokio::test]
    async fn test_abandoned_listen_unloads_grammar() {
        let engine = ScriptedEngine {
            idle_when_done: true,
            ..Default::default()
        };
        let config = SessionConfig::default().with_poll_interval(Duration::from_millis(1));
        let mut session = AsyncSession::new(engine, config);

        let waited =
            tokio::time::timeout(Duration::from_millis(20), session.listen(&grammar("first"))).await;
        assert!(waited.is_err());
        assert_eq!(None, session.active_grammar());
        assert_eq!(1, session.engine().unloads);

        session.engine_mut().outcomes.push_back(Ok(Some(recognition("Kim"))));
        let phrase = session.listen(&grammar("second")).await.unwrap();
        assert_eq!("Kim", phrase.semantics["name"]);
        assert_eq!(vec!["first".to_string(), "second".to_string()], session.engine().loaded);
    }
}

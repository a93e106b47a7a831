use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use tracing::error;

use crate::assistant::audio::SpeechClip;
use crate::assistant::client::{AssistantBackend, ChatMessage, ClientError};

pub enum Job {
    Chat { history: Vec<ChatMessage>, message: String },
    Vision { image: Vec<u8>, mime: String },
    Speech { text: String },
}

pub enum Reply {
    Chat(Result<String, ClientError>),
    Vision(Result<String, ClientError>),
    Speech(Result<SpeechClip, ClientError>),
}

pub struct Outcome {
    pub seq: u64,
    pub reply: Reply,
}

/// One background thread owning the AI backend. Jobs go in over a channel,
/// outcomes come back tagged with their submission sequence number so the
/// panel can drop replies that newer requests have superseded. The UI loop
/// polls; nothing here ever blocks it.
pub struct Worker {
    jobs: Sender<(u64, Job)>,
    outcomes: Receiver<Outcome>,
    next_seq: u64,
}

impl Worker {
    pub fn spawn<B: AssistantBackend + 'static>(backend: B) -> Self {
        let (job_tx, job_rx) = channel::<(u64, Job)>();
        let (outcome_tx, outcome_rx) = channel();
        thread::spawn(move || {
            for (seq, job) in job_rx {
                let reply = match job {
                    Job::Chat { history, message } => Reply::Chat(backend.chat(&history, &message)),
                    Job::Vision { image, mime } => Reply::Vision(backend.analyze_image(&image, &mime)),
                    Job::Speech { text } => Reply::Speech(backend.synthesize(&text)),
                };
                if outcome_tx.send(Outcome { seq, reply }).is_err() {
                    break; // UI side is gone, wind the thread down
                }
            }
        });
        Self {
            jobs: job_tx,
            outcomes: outcome_rx,
            next_seq: 0,
        }
    }

    pub fn submit(&mut self, job: Job) -> u64 {
        self.next_seq += 1;
        if self.jobs.send((self.next_seq, job)).is_err() {
            error!("assistant worker thread is gone; request dropped");
        }
        self.next_seq
    }

    /// Non-blocking; called once per frame.
    pub fn poll(&mut self) -> Option<Outcome> {
        self.outcomes.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    struct StubBackend;

    impl AssistantBackend for StubBackend {
        fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String, ClientError> {
            Ok(format!("chat({}, {message})", history.len()))
        }

        fn analyze_image(&self, image: &[u8], mime: &str) -> Result<String, ClientError> {
            Ok(format!("vision({} bytes, {mime})", image.len()))
        }

        fn synthesize(&self, _text: &str) -> Result<SpeechClip, ClientError> {
            Err(ClientError::EmptyResponse)
        }
    }

    fn wait_for_outcome(worker: &mut Worker) -> Outcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = worker.poll() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "worker never replied");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn outcomes_carry_their_submission_sequence() {
        let mut worker = Worker::spawn(StubBackend);
        let first = worker.submit(Job::Chat { history: vec![], message: "a".into() });
        let second = worker.submit(Job::Speech { text: "b".into() });
        assert!(second > first);

        let outcome = wait_for_outcome(&mut worker);
        assert_eq!(outcome.seq, first);
        match outcome.reply {
            Reply::Chat(Ok(text)) => assert_eq!(text, "chat(0, a)"),
            _ => panic!("expected the chat reply first"),
        }

        let outcome = wait_for_outcome(&mut worker);
        assert_eq!(outcome.seq, second);
        assert!(matches!(outcome.reply, Reply::Speech(Err(_))));
    }

    #[test]
    fn vision_jobs_reach_the_backend() {
        let mut worker = Worker::spawn(StubBackend);
        worker.submit(Job::Vision { image: vec![0; 16], mime: "image/png".into() });
        let outcome = wait_for_outcome(&mut worker);
        match outcome.reply {
            Reply::Vision(Ok(text)) => assert_eq!(text, "vision(16 bytes, image/png)"),
            _ => panic!("expected a vision reply"),
        }
    }
}

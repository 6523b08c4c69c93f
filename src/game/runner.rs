//! Session task: a single consumer applying commands one at a time

use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tracing::info;

use crate::config::GameConfig;
use crate::game::scheduler::TokioScheduler;
use crate::game::session::{Session, SessionCommand};
use crate::game::words::WordList;

pub type SessionTx = UnboundedSender<SessionCommand>;

/// Spawn the session task and return the handle connections talk to.
pub fn spawn_session(config: GameConfig, words: WordList) -> SessionTx {
    let (tx, mut rx) = unbounded_channel::<SessionCommand>();
    let scheduler = TokioScheduler::new(tx.clone());

    tokio::spawn(async move {
        let mut session = Session::new(config, words, Box::new(scheduler));
        info!("Session started");

        while let Some(command) = rx.recv().await {
            session.handle(command);
        }

        info!("Session stopped");
    });

    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::message::{ClientMessage, ServerMessage};
    use std::time::Duration;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::time::sleep;
    use uuid::Uuid;

    fn join(session: &SessionTx, name: &str) -> UnboundedReceiver<ServerMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        session
            .send(SessionCommand::Connect { id, sender: tx })
            .unwrap();
        session
            .send(SessionCommand::Client {
                from: id,
                message: ClientMessage::SetName {
                    name: name.to_string(),
                },
            })
            .unwrap();
        rx
    }

    fn drain(rx: &mut UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = rx.try_recv() {
            messages.push(message);
        }
        messages
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_runs_on_real_timers() {
        let config = GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        };
        let session = spawn_session(config, WordList::from_text("apple\nmango").unwrap());

        let mut ra = join(&session, "P1");
        let _rb = join(&session, "P2");

        sleep(Duration::from_millis(2500)).await;

        let messages = drain(&mut ra);
        assert!(messages.contains(&ServerMessage::RoundResetUi));
        assert!(messages.contains(&ServerMessage::RemainingTime { seconds: 70 }));
        assert!(messages.contains(&ServerMessage::RemainingTime { seconds: 69 }));
        assert!(messages.contains(&ServerMessage::RemainingTime { seconds: 68 }));
        assert!(!messages.contains(&ServerMessage::RemainingTime { seconds: 67 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_rolls_over_after_timeout() {
        let config = GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        };
        let session = spawn_session(config, WordList::from_text("apple\nmango").unwrap());

        let mut ra = join(&session, "P1");
        let _rb = join(&session, "P2");

        // 70s of round plus the pause before the next one
        sleep(Duration::from_secs(76)).await;

        let resets = drain(&mut ra)
            .into_iter()
            .filter(|m| *m == ServerMessage::RoundResetUi)
            .count();
        assert_eq!(resets, 2);
    }
}

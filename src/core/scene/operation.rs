//=========================================================================
// Scene Operation
//=========================================================================
//
// Completion handle for asynchronous scene loads and unloads.
//
// Architecture:
//   SceneHost::load_scene() ──> SceneOperation (Receiver<()>)
//                               SceneCompletion (Sender<()>) ──> host loader
//
//   GameInstance / GameMode poll is_done() once per tick; the host signals
//   through complete() whenever its loader finishes.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::warn;

//=== SceneOperation ======================================================

/// Pending scene load or unload.
///
/// Polled with [`is_done`](Self::is_done); never blocks.
#[derive(Debug)]
pub struct SceneOperation {
    scene: String,
    receiver: Option<Receiver<()>>,
}

impl SceneOperation {
    //--- Construction -----------------------------------------------------

    /// Creates a pending operation and the completion half handed to the
    /// host's loader.
    pub fn pending(scene: impl Into<String>) -> (Self, SceneCompletion) {
        let scene = scene.into();
        let (sender, receiver) = bounded(1);

        (
            Self {
                scene: scene.clone(),
                receiver: Some(receiver),
            },
            SceneCompletion { scene, sender },
        )
    }

    /// Creates an operation that is already complete.
    ///
    /// For hosts whose loads finish synchronously.
    pub fn completed(scene: impl Into<String>) -> Self {
        Self {
            scene: scene.into(),
            receiver: None,
        }
    }

    //--- Polling ----------------------------------------------------------

    /// Returns true once the host signalled completion.
    ///
    /// A completion half dropped without signalling also ends the
    /// operation, with a warning, so a broken loader cannot stall a
    /// transition forever.
    pub fn is_done(&mut self) -> bool {
        let Some(receiver) = &self.receiver else {
            return true;
        };

        match receiver.try_recv() {
            Ok(()) => {}
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                warn!("Scene operation for {} was dropped without completing", self.scene);
            }
        }

        self.receiver = None;
        true
    }

    /// The scene this operation loads or unloads.
    pub fn scene(&self) -> &str {
        &self.scene
    }
}

//=== SceneCompletion =====================================================

/// Host-side half of a [`SceneOperation`].
#[derive(Debug)]
pub struct SceneCompletion {
    scene: String,
    sender: Sender<()>,
}

impl SceneCompletion {
    /// Signals that the scene operation finished.
    pub fn complete(self) {
        // The operation may already be gone if its transition was dropped
        let _ = self.sender.send(());
    }

    /// The scene this completion belongs to.
    pub fn scene(&self) -> &str {
        &self.scene
    }
}

//=========================================================================
// Tests
//=========================================================================

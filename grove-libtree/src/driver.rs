use std::collections::VecDeque;

use crate::TreeBrowser;
use crate::command::BrowserCommand;
use crate::event::BrowserEffect;
use crate::source::{NodeSource, load_node};

/// Process one command to quiescence against a blocking node source.
///
/// Every `LoadRequested` effect is executed inline through [`load_node`]
/// and its completion is fed back as a command, so a single `run` call
/// drives the whole operation, including queued follow-ups, to its end.
/// The returned effects are the externally visible ones, in order.
///
/// Hosts with their own async runtime skip this pump: they execute
/// `LoadRequested` themselves and feed `LoadCompleted` back through
/// [`TreeBrowser::reduce`].
pub fn run<S>(
    browser: &mut TreeBrowser,
    source: &S,
    command: BrowserCommand,
) -> Vec<BrowserEffect>
where
    S: NodeSource + ?Sized,
{
    let mut queue = VecDeque::from([command]);
    let mut external = Vec::new();

    while let Some(command) = queue.pop_front() {
        for effect in browser.reduce(command) {
            match effect {
                BrowserEffect::LoadRequested { path, filter } => {
                    let descriptor = load_node(
                        source,
                        browser.codec(),
                        &path,
                        filter.as_deref(),
                    );
                    queue.push_back(BrowserCommand::LoadCompleted {
                        path,
                        descriptor,
                    });
                },
                effect => external.push(effect),
            }
        }
    }

    external
}

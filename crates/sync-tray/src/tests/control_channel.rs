use crate::{ChannelExit, ControlChannel, TrayCommand, control_channel::ChannelState};

use std::{
    panic::Location,
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
        mpsc as std_mpsc,
    },
    task::{Context, Poll},
    time::Duration,
};

use error_location::ErrorLocation;
use futures_util::{Sink, sink, stream};
use sync_tray_core::{
    CoreError, CoreResult, ImageFetcher, MenuEntry, OutboundAction, TempImageCache, TrayState,
    decode_action,
};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};

const BASE_URL: &str = "http://127.0.0.1:51601/api/rs";

/// Serves fixed PNG-ish bytes and records what was asked for.
#[derive(Clone, Default)]
struct FakeFetcher {
    requests: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl FakeFetcher {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[allow(clippy::unwrap_used)]
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl ImageFetcher for FakeFetcher {
    #[allow(clippy::unwrap_used)]
    async fn fetch_bytes(&self, url: &str) -> CoreResult<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());

        if self.fail {
            return Err(CoreError::ImageFetch {
                reason: format!("404 for {url}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(b"\x89PNG".to_vec())
    }
}

struct Harness {
    channel: ControlChannel<std_mpsc::Sender<TrayCommand>, TempImageCache<FakeFetcher>>,
    ui_rx: std_mpsc::Receiver<TrayCommand>,
    action_tx: mpsc::Sender<OutboundAction>,
    fetcher: FakeFetcher,
}

impl Harness {
    #[allow(clippy::unwrap_used)]
    fn new(fetcher: FakeFetcher) -> Self {
        let (ui_tx, ui_rx) = std_mpsc::channel();
        let (action_tx, action_rx) = mpsc::channel(8);
        let images = TempImageCache::new(BASE_URL, fetcher.clone()).unwrap();

        let channel = ControlChannel::new(
            TrayState::new(),
            images,
            ui_tx,
            action_rx,
            Duration::ZERO,
        );

        Self {
            channel,
            ui_rx,
            action_tx,
            fetcher,
        }
    }

    fn posted(&self) -> Vec<TrayCommand> {
        self.ui_rx.try_iter().collect()
    }
}

fn text(frame: &str) -> Result<Message, tungstenite::Error> {
    Ok(Message::Text(frame.to_string().into()))
}

/// Sink that forwards every message into a channel the test can drain.
fn recording_sink(
    tx: mpsc::UnboundedSender<Message>,
) -> impl futures_util::Sink<Message, Error = tungstenite::Error> + Unpin {
    Box::pin(sink::unfold(tx, |tx, msg: Message| async move {
        let _ = tx.send(msg);
        Ok::<_, tungstenite::Error>(tx)
    }))
}

/// Sink that refuses every message and keeps accepting attempts afterwards.
#[derive(Clone, Default)]
struct RejectingSink {
    attempts: Arc<AtomicUsize>,
}

impl RejectingSink {
    fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Sink<Message> for RejectingSink {
    type Error = tungstenite::Error;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, _item: Message) -> Result<(), Self::Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(tungstenite::Error::AlreadyClosed)
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }
}

fn status_lines(command: &TrayCommand) -> Vec<String> {
    match command {
        TrayCommand::SetMenu(tree) => tree
            .entries
            .iter()
            .filter_map(|entry| match entry {
                MenuEntry::Status { text } => Some(text.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// WHAT: Startup shows the default tray icon and the empty-state menu
/// WHY: The tray must be usable before the host sends anything
#[tokio::test]
async fn given_new_channel_when_initializing_then_icon_and_menu_posted() {
    // Given: A fresh channel
    let mut harness = Harness::new(FakeFetcher::default());

    // When: Initializing
    harness.channel.initialize().await;

    // Then: tray.png fetched, icon then menu posted
    assert_eq!(
        harness.fetcher.requests(),
        vec![format!("{BASE_URL}/tray.png")]
    );

    let posted = harness.posted();
    assert_eq!(posted.len(), 2);
    assert!(matches!(&posted[0], TrayCommand::SetIcon(path) if path.exists()));
    assert_eq!(status_lines(&posted[1]), vec!["All files in sync"]);
}

/// WHAT: A bogus frame is dropped and the next valid frame still applies
/// WHY: One bad message must never stall the channel
#[tokio::test]
async fn given_bogus_then_valid_frame_when_serving_then_valid_frame_applied() {
    // Given: A bogus frame followed by a watch list, then the host hangs up
    let mut harness = Harness::new(FakeFetcher::default());
    let read = stream::iter(vec![
        text("<bogus>not xml"),
        text(
            "<updateWatchesGuiInternalEvent>\
             <folder>/home/u/A</folder><folder>/home/u/B</folder>\
             </updateWatchesGuiInternalEvent>",
        ),
    ]);
    let (out_tx, _out_rx) = mpsc::unbounded_channel();

    // When: Serving until the stream ends
    let exit = harness.channel.serve(read, recording_sink(out_tx)).await;

    // Then: Exactly one menu rebuild carrying both folders, channel closed
    assert_eq!(exit, ChannelExit::Closed);
    assert_eq!(harness.channel.channel_state(), ChannelState::Closed);
    assert_eq!(
        harness.channel.tray_state().watch_list(),
        &["/home/u/A".to_string(), "/home/u/B".to_string()]
    );

    let posted = harness.posted();
    assert_eq!(posted.len(), 1);
    let folder_menus: Vec<&str> = match &posted[0] {
        TrayCommand::SetMenu(tree) => tree
            .entries
            .iter()
            .filter_map(|entry| match entry {
                MenuEntry::Submenu { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    assert_eq!(folder_menus, vec!["A", "B"]);
}

/// WHAT: Status updates rebuild the menu in first-seen root order
/// WHY: Upserting an existing root must not reorder the status lines
#[tokio::test]
async fn given_status_updates_when_handling_then_menu_keeps_root_order() {
    // Given: A channel
    let mut harness = Harness::new(FakeFetcher::default());

    // When: Root A, root B, then A again
    harness
        .channel
        .handle_frame("<updateStatusTextGuiInternalEvent><root>/x/A</root><text>Syncing</text></updateStatusTextGuiInternalEvent>")
        .await;
    harness
        .channel
        .handle_frame("<updateStatusTextGuiInternalEvent><root>/x/B</root><text>Idle</text></updateStatusTextGuiInternalEvent>")
        .await;
    harness
        .channel
        .handle_frame("<updateStatusTextGuiInternalEvent><root>/x/A</root><text>Indexing</text></updateStatusTextGuiInternalEvent>")
        .await;

    // Then: The last menu shows A before B with A's new text
    let posted = harness.posted();
    assert_eq!(posted.len(), 3);
    assert_eq!(
        status_lines(&posted[2]),
        vec!["A\nIndexing", "B\nIdle"]
    );
}

/// WHAT: Notifications carry the tray image as their icon
/// WHY: Popups show the application icon next to the text
#[tokio::test]
async fn given_notify_frame_when_handling_then_notification_with_icon_posted() {
    // Given: A channel
    let mut harness = Harness::new(FakeFetcher::default());

    // When: A notification arrives
    harness
        .channel
        .handle_frame(
            "<displayNotificationGuiInternalEvent>\
             <subject>Files added</subject><message>3 files in Photos</message>\
             </displayNotificationGuiInternalEvent>",
        )
        .await;

    // Then: One popup, no menu rebuild
    let posted = harness.posted();
    assert_eq!(posted.len(), 1);
    assert!(matches!(
        &posted[0],
        TrayCommand::Notify {
            subject,
            message,
            icon: Some(path),
        } if subject == "Files added" && message == "3 files in Photos" && path.exists()
    ));
}

/// WHAT: A notification is still shown when its icon cannot be fetched
/// WHY: Image failures only lose the picture, never the message
#[tokio::test]
async fn given_failing_fetcher_when_notifying_then_notification_without_icon() {
    // Given: A channel whose images all fail
    let mut harness = Harness::new(FakeFetcher::failing());

    // When: A notification arrives
    harness
        .channel
        .handle_frame(
            "<displayNotificationGuiInternalEvent>\
             <subject>s</subject><message>m</message>\
             </displayNotificationGuiInternalEvent>",
        )
        .await;

    // Then: Posted without an icon
    let posted = harness.posted();
    assert!(matches!(
        posted.as_slice(),
        [TrayCommand::Notify { icon: None, .. }]
    ));
}

/// WHAT: Icon updates fetch "/" + filename and post the local path
/// WHY: The renderer loads icons from disk
#[tokio::test]
async fn given_icon_frame_when_handling_then_image_fetched_and_icon_posted() {
    // Given: A channel
    let mut harness = Harness::new(FakeFetcher::default());

    // When: The host switches icons
    harness
        .channel
        .handle_frame("<updateTrayIconGuiInternalEvent><filename>tray-syncing1.png</filename></updateTrayIconGuiInternalEvent>")
        .await;

    // Then: Fetched from base URL, posted as SetIcon
    assert_eq!(
        harness.fetcher.requests(),
        vec![format!("{BASE_URL}/tray-syncing1.png")]
    );
    assert!(matches!(harness.posted().as_slice(), [TrayCommand::SetIcon(_)]));
    assert_eq!(
        harness.channel.tray_state().icon_ref(),
        Some("tray-syncing1.png")
    );
}

/// WHAT: A failed icon download keeps the previous icon
/// WHY: The tray never goes blank because of a missing image
#[tokio::test]
async fn given_failing_fetcher_when_icon_frame_then_nothing_posted() {
    // Given: A channel whose images all fail
    let mut harness = Harness::new(FakeFetcher::failing());

    // When: The host switches icons
    harness
        .channel
        .handle_frame("<updateTrayIconGuiInternalEvent><filename>missing.png</filename></updateTrayIconGuiInternalEvent>")
        .await;

    // Then: No icon change reaches the UI
    assert!(harness.posted().is_empty());
}

/// WHAT: Unknown message kinds change nothing
/// WHY: Newer hosts may send events this client does not know
#[tokio::test]
async fn given_unknown_frame_when_handling_then_nothing_posted() {
    // Given: A channel
    let mut harness = Harness::new(FakeFetcher::default());
    let before = harness.channel.tray_state().clone();

    // When: An unknown but well-formed frame arrives
    harness
        .channel
        .handle_frame("<somethingNewGuiInternalEvent><x>1</x></somethingNewGuiInternalEvent>")
        .await;

    // Then: Same state, nothing for the UI
    assert_eq!(harness.channel.tray_state(), &before);
    assert!(harness.posted().is_empty());
}

/// WHAT: A close frame ends the loop as Closed
/// WHY: Losing the host ends the process
#[tokio::test]
async fn given_close_frame_when_serving_then_closed() {
    // Given: A transport that only closes
    let mut harness = Harness::new(FakeFetcher::default());
    let read = stream::iter(vec![Ok(Message::Close(None))]);
    let (out_tx, _out_rx) = mpsc::unbounded_channel();

    // When: Serving
    let exit = harness.channel.serve(read, recording_sink(out_tx)).await;

    // Then: Closed without any UI update
    assert_eq!(exit, ChannelExit::Closed);
    assert!(harness.posted().is_empty());
}

/// WHAT: A transport error ends the loop as Closed
/// WHY: Errors and clean closes are handled alike
#[tokio::test]
async fn given_transport_error_when_serving_then_closed() {
    // Given: A transport that fails immediately
    let mut harness = Harness::new(FakeFetcher::default());
    let read = stream::iter(vec![Err(tungstenite::Error::ConnectionClosed)]);
    let (out_tx, _out_rx) = mpsc::unbounded_channel();

    // When: Serving
    let exit = harness.channel.serve(read, recording_sink(out_tx)).await;

    // Then: Closed
    assert_eq!(exit, ChannelExit::Closed);
    assert_eq!(harness.channel.channel_state(), ChannelState::Closed);
}

/// WHAT: Menu clicks leave as frames and Exit shuts down after purging images
/// WHY: The host must learn about the exit before the tray disappears
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_clicks_ending_in_exit_when_serving_then_frames_sent_and_shutdown_posted() {
    // Given: A channel with a cached icon and two queued clicks
    let mut harness = Harness::new(FakeFetcher::default());
    harness.channel.initialize().await;
    let icon = harness
        .posted()
        .into_iter()
        .find_map(|command| match command {
            TrayCommand::SetIcon(path) => Some(path),
            _ => None,
        })
        .unwrap();
    assert!(icon.exists());

    harness
        .action_tx
        .send(OutboundAction::OpenFolderRequested {
            folder: "/home/u/A & B".to_string(),
        })
        .await
        .unwrap();
    harness
        .action_tx
        .send(OutboundAction::ExitRequested)
        .await
        .unwrap();

    let read = Box::pin(stream::pending::<Result<Message, tungstenite::Error>>());
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();

    // When: Serving
    let exit = harness.channel.serve(read, recording_sink(out_tx)).await;

    // Then: Both frames went out in order, images purged, UI told to quit
    assert_eq!(exit, ChannelExit::ExitRequested);

    let mut sent = Vec::new();
    while let Ok(Message::Text(frame)) = out_rx.try_recv() {
        sent.push(decode_action(frame.as_str()).unwrap());
    }
    assert_eq!(
        sent,
        vec![
            OutboundAction::OpenFolderRequested {
                folder: "/home/u/A & B".to_string()
            },
            OutboundAction::ExitRequested,
        ]
    );

    assert!(!icon.exists());
    assert!(matches!(harness.posted().as_slice(), [TrayCommand::Shutdown]));
}

/// WHAT: A rejected write surfaces as a transport error
/// WHY: The receive loop logs it instead of ending
#[tokio::test]
async fn given_rejecting_sink_when_sending_action_then_transport_error_returned() {
    // Given: A sink that rejects everything
    let mut harness = Harness::new(FakeFetcher::default());
    let mut write = RejectingSink::default();

    // When: Sending an action directly
    let result = harness
        .channel
        .send_action(&mut write, &OutboundAction::DonateRequested)
        .await;

    // Then: Typed transport error, one attempt, nothing posted to the UI
    assert!(matches!(result, Err(crate::AppError::Transport { .. })));
    assert_eq!(write.attempts(), 1);
    assert!(harness.posted().is_empty());
}

/// WHAT: The receive loop survives a failed send and applies later frames
/// WHY: Clicks while the transport hiccups must not kill the tray
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_rejected_click_when_serving_then_next_frame_still_applied() {
    // Given: A queued click, a sink that rejects it, and a frame arriving afterwards
    let mut harness = Harness::new(FakeFetcher::default());
    harness
        .action_tx
        .send(OutboundAction::WebsiteRequested)
        .await
        .unwrap();

    let write = RejectingSink::default();
    let read = Box::pin(stream::once(async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        text("<updateWatchesGuiInternalEvent><folder>/home/u/A</folder></updateWatchesGuiInternalEvent>")
    }));

    // When: Serving until the host hangs up
    let exit = harness.channel.serve(read, write.clone()).await;

    // Then: The send was tried, the frame applied, and the loop ended only on close
    assert_eq!(write.attempts(), 1);
    assert_eq!(exit, ChannelExit::Closed);
    assert_eq!(
        harness.channel.tray_state().watch_list(),
        &["/home/u/A".to_string()]
    );
    assert!(matches!(harness.posted().as_slice(), [TrayCommand::SetMenu(_)]));
}

/// WHAT: Exit still purges images and shuts down when its frame cannot be sent
/// WHY: A dead transport must not leave the tray running or temp files behind
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_rejecting_sink_when_exit_clicked_then_purged_and_shutdown_posted() {
    // Given: A cached icon, a failed click and an exit click
    let mut harness = Harness::new(FakeFetcher::default());
    harness.channel.initialize().await;
    let icon = harness
        .posted()
        .into_iter()
        .find_map(|command| match command {
            TrayCommand::SetIcon(path) => Some(path),
            _ => None,
        })
        .unwrap();

    harness
        .action_tx
        .send(OutboundAction::DonateRequested)
        .await
        .unwrap();
    harness
        .action_tx
        .send(OutboundAction::ExitRequested)
        .await
        .unwrap();

    let write = RejectingSink::default();
    let read = Box::pin(stream::pending::<Result<Message, tungstenite::Error>>());

    // When: Serving
    let exit = harness.channel.serve(read, write.clone()).await;

    // Then: Both sends attempted, cache purged, UI told to quit
    assert_eq!(exit, ChannelExit::ExitRequested);
    assert_eq!(write.attempts(), 2);
    assert!(!icon.exists());
    assert!(matches!(harness.posted().as_slice(), [TrayCommand::Shutdown]));
}

//! Test doubles for the transport seam.

use std::sync::{Arc, Mutex};

use crate::infrastructure::transport::{MockConnector, MockLink};

/// Frames written through a recording link, in order
pub(crate) type Sent = Arc<Mutex<Vec<String>>>;

/// Link that records every frame and accepts any number of closes
pub(crate) fn recording_link(sent: Sent) -> MockLink {
    let mut link = MockLink::new();
    link.expect_send_text().returning(move |text| {
        sent.lock().unwrap().push(text);
        Ok(())
    });
    link.expect_close().return_const(());
    link
}

/// Connector that hands out `links` in order and records the URLs it opened
pub(crate) fn connector_with(links: Vec<MockLink>, urls: Arc<Mutex<Vec<String>>>) -> MockConnector {
    let count = links.len();
    let links = Mutex::new(links.into_iter());
    let mut connector = MockConnector::new();
    connector
        .expect_open()
        .times(count)
        .returning(move |_, url, _| {
            urls.lock().unwrap().push(url.to_string());
            Box::new(links.lock().unwrap().next().unwrap())
        });
    connector
}

/// Snapshot of the frames recorded so far
pub(crate) fn sent_frames(sent: &Sent) -> Vec<String> {
    sent.lock().unwrap().clone()
}

use crate::controller::{LayerController, Resolution};
use crate::error::Result;
use crate::host::LayerHost;
use log::debug;
use nav_core::request::{MetadataSource, Ticket};

/// Run fetches for `first` and every ticket it leads to, until the cascade
/// settles, a reply turns out stale, or a fetch fails.
pub async fn run_cascade<S: MetadataSource, H: LayerHost>(
    controller: &mut LayerController,
    source: &S,
    host: &mut H,
    first: Ticket,
) -> Result<Resolution> {
    let mut ticket = first;
    loop {
        debug!("Fetching {}", ticket);
        let outcome = source.fetch(&ticket.request).await;
        match controller.resolve(&ticket, outcome, host)? {
            Resolution::Next(next) => ticket = next,
            settled => return Ok(settled),
        }
    }
}

// Example: a content source that builds rows later, e.g. after fetching their data.
use std::sync::{Arc, Mutex};

use lazy_repeat::{
    ContentDelegate, Creation, DynamicSource, Engine, EngineOptions, MemoryHost, Ticket,
};

fn main() -> lazy_repeat::Result<()> {
    let queue: Arc<Mutex<Vec<Ticket>>> = Arc::default();
    let requests = Arc::clone(&queue);
    let source = DynamicSource::default()
        .with_count_items(|| 500)
        .with_deferred_create(move |_index, _template: Option<&String>, ticket| {
            requests.lock().unwrap().push(ticket);
            Creation::Deferred
        })
        .with_destroy_item(|index, _row: &mut String| println!("destroyed row {index}"));

    let mut e = Engine::new(
        MemoryHost::new(200, 20),
        ContentDelegate::new(source),
        EngineOptions::new(),
    )?;
    let ready = e.ready();
    println!("pending={} refreshing={}", e.pending_len(), e.is_refreshing());

    // A second refresh is rejected while the first one is still waiting for rows.
    println!("refresh while busy: {:?}", e.refresh().err());

    // Scroll before anything arrived: the outstanding tickets become stale.
    let stale: Vec<Ticket> = queue.lock().unwrap().drain(..).collect();
    e.host_mut().scroll_to(4_000);
    println!("after scroll: {:?}", e.render()?);

    for ticket in stale.into_iter().take(2) {
        let mounted = e.complete(ticket, format!("late row {}", ticket.index))?;
        println!("stale ticket for {} mounted={mounted}", ticket.index);
    }

    let fresh: Vec<Ticket> = queue.lock().unwrap().drain(..).collect();
    for ticket in fresh {
        e.complete(ticket, format!("row {}", ticket.index))?;
    }
    println!(
        "ready={:?} rendered={} first={:?}",
        ready.result(),
        e.rendered().len(),
        e.rendered().first_index()
    );
    Ok(())
}

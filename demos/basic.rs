// Example: a million-row list where only the rows in view are mounted.
use lazy_repeat::{ContentDelegate, DynamicSource, Engine, EngineOptions, MemoryHost};

fn main() -> lazy_repeat::Result<()> {
    let source = DynamicSource::new(|| 1_000_000, |index, _template| format!("row #{index}"))
        .with_update_item(|index, row: &mut String| {
            // Rows that stay in the window are refreshed in place.
            *row = format!("row #{index} (updated)");
        });

    // A 600px viewport where every row measures 30px.
    let host = MemoryHost::new(600, 30);
    let mut e = Engine::new(host, ContentDelegate::new(source), EngineOptions::new())?;

    println!("content_extent={}", e.host().content_extent());
    println!(
        "rendered={} first={:?} last={:?}",
        e.rendered().len(),
        e.rendered().first_index(),
        e.rendered().last_index()
    );

    e.host_mut().scroll_to(15_000_000);
    let report = e.render()?;
    println!("after scroll: {report:?}");
    println!(
        "first={:?} last={:?} item_height(0)={}",
        e.rendered().first_index(),
        e.rendered().last_index(),
        e.item_height(0)
    );
    if let Some((index, row)) = e.rendered().iter().next() {
        println!("top row {index} at {}: {}", row.top, row.row);
    }

    e.destroy()
}

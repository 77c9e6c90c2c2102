use bilete_api::{FileSource, TicketSource};
use bilete_core::{parse_filter, PriceTable, TicketListView};
use std::fs;

fn export(count: usize) -> String {
    let tickets: Vec<String> = (0..count)
        .map(|idx| {
            let tip = if idx % 2 == 0 { "BAL" } else { "BAL + AFTER" };
            format!(
                r#"{{"_id":"t{idx}","nume":"Invitat {idx}","telefon":"+4072{idx:07}","tip_bilet":"{tip}","verified":{},"sent":false}}"#,
                idx % 3 == 0
            )
        })
        .collect();
    format!(r#"{{"tickets":[{}]}}"#, tickets.join(","))
}

#[test]
fn exported_tickets_flow_into_the_list_view() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickets.json");
    fs::write(&path, export(120)).expect("write export");

    let tickets = FileSource::new(&path).fetch_tickets().expect("load");
    assert_eq!(tickets.len(), 120);

    let mut view = TicketListView::with_tickets(tickets, 50).expect("view");
    assert_eq!(view.total_pages(), 3);
    view.go_to_page(3);
    assert_eq!(view.snapshot().items.len(), 20);

    view.set_criteria(parse_filter(r#"type:"BAL + AFTER" status:verified"#).expect("filter"));
    let snapshot = view.snapshot();
    assert_eq!(snapshot.current_page, 1);
    // odd indexes divisible by three: 3, 9, 15, ... 117
    assert_eq!(snapshot.total_filtered, 20);
    assert!(snapshot
        .items
        .iter()
        .all(|ticket| ticket.verified && ticket.tip_bilet.label() == "BAL + AFTER"));

    let summary = view.summary(&PriceTable::default());
    assert_eq!(summary.count, 120);
    assert_eq!(summary.total_cost, 60 * 60 + 60 * 160);
}

#[test]
fn bare_array_export_is_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickets.json");
    fs::write(&path, r#"[{"id":"a","nume":"Ana"}]"#).expect("write");

    let source = FileSource::new(&path);
    assert_eq!(source.source_name(), "file");
    let tickets = source.fetch_tickets().expect("load");
    assert_eq!(tickets[0].id.as_str(), "a");
}

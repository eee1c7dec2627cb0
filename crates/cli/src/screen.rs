use chartsense_core::domain::signal::SignalClass;
use chartsense_core::render::{ResultView, SessionView};

pub fn print_help() {
    println!("type to search (2+ chars) | :pick N | :analyze | :clear | :quit");
}

pub fn print_session(view: &SessionView<'_>) {
    println!();
    if view.show_clear_button {
        println!("search: {}  [x]", view.query);
    } else {
        println!("search: (empty)");
    }

    if view.searching {
        println!("  searching...");
    }
    if let Some(banner) = view.banner {
        println!("  ! {banner}");
    }
    for (i, entry) in view.suggestions.iter().enumerate() {
        println!("  {:>2}. {}  {}", i + 1, entry.symbol, entry.name);
    }

    if let Some(symbol) = view.selected_symbol {
        let hint = if view.can_analyze { "  (:analyze)" } else { "" };
        println!("selected: {symbol}{hint}");
    }
    if view.analyzing {
        println!("  analyzing...");
    }
    if let Some(result) = &view.result {
        print_result(result);
    }
}

pub fn print_result(view: &ResultView) {
    match view {
        ResultView::Error(message) => println!("error: {message}"),
        ResultView::Report(report) => {
            println!("{}", report.title);
            println!("  price: {}", report.price);
            println!(
                "  recommendation: {} [{}]",
                report.recommendation,
                tag(report.recommendation_class)
            );
            for row in &report.rows {
                println!(
                    "  {:<16} {:<48} {} [{}]",
                    row.label,
                    row.detail,
                    row.signal,
                    tag(row.class)
                );
            }
            println!("  {}", report.summary);
        }
    }
}

fn tag(class: SignalClass) -> &'static str {
    class.color_name()
}

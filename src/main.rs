// Entry point and interactive CLI flow.
//
// - Option [1] loads the three fact tables from the data directory.
// - Option [2] picks the state and year the filtered reports use.
// - Option [3] generates all six reports plus a JSON summary, then asks
//   whether to go back to the menu or exit.
use phonepe_insights::config::Config;
use phonepe_insights::output;
use phonepe_insights::reports;
use phonepe_insights::util::{format_int, format_number};
use phonepe_insights::{CsvDirectoryProvider, Dashboard, InsightsResult};
use std::env;
use std::io::{self, Write};

struct App {
    config: Config,
    dashboard: Option<Dashboard>,
    state: Option<String>,
    year: Option<i32>,
}

/// Print `prompt` and read a single trimmed line.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Returns `true` if the user chose `Y`, `false` for `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Report Selection (Y/N): ")
            .to_uppercase()
            .as_str()
        {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(app: &mut App) {
    let provider = CsvDirectoryProvider::new(&app.config.data_dir);
    let result = if let Some(dashboard) = app.dashboard.as_mut() {
        dashboard.reload(&provider)
    } else {
        Dashboard::load(&provider).map(|(dashboard, report)| {
            app.dashboard = Some(dashboard);
            report
        })
    };
    match result {
        Ok(report) => {
            println!(
                "Loaded fact tables from {}: {} user rows, {} transaction rows, {} insurance rows",
                provider.dir().display(),
                format_int(report.user_activity.loaded_rows as u64),
                format_int(report.transaction_map.loaded_rows as u64),
                format_int(report.insurance.loaded_rows as u64)
            );
            println!(
                "Note: {} rows skipped due to parse/validation errors.\n",
                format_int(report.skipped_rows() as u64)
            );
        }
        Err(e) => {
            log::error!("load failed: {}", e);
            eprintln!("Failed to load fact tables: {}\n", e);
        }
    }
}

fn handle_select(app: &mut App) {
    let Some(dashboard) = app.dashboard.as_ref() else {
        println!("Error: No data loaded. Please load the fact tables first (option 1).\n");
        return;
    };
    let options = dashboard.filter_options();
    println!("States: {}", options.states.join(", "));
    let state = read_line("Select State: ");
    if !state.is_empty() {
        app.state = Some(state);
    }
    let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
    println!("Years: {}", years.join(", "));
    match read_line("Select Year: ").parse::<i32>() {
        Ok(year) => app.year = Some(year),
        Err(_) => println!("Invalid year, keeping the previous selection."),
    }
    println!("");
}

fn handle_generate_reports(app: &mut App) -> InsightsResult<()> {
    let Some(dashboard) = app.dashboard.as_mut() else {
        println!("Error: No data loaded. Please load the fact tables first (option 1).\n");
        return Ok(());
    };
    let options = dashboard.filter_options();
    let state = app
        .state
        .clone()
        .or_else(|| options.states.first().cloned())
        .unwrap_or_default();
    let year = app
        .year
        .or_else(|| options.years.first().copied())
        .unwrap_or_default();
    let out = &app.config.out_dir;
    std::fs::create_dir_all(out)?;

    println!("Generating reports for {} / {}...\n", state, year);

    let r1 = dashboard.transactions_by_quarter_and_type(&state, year);
    let file1 = out.join("report1_transaction_dynamics.csv");
    output::write_pivot_csv(&file1, &r1)?;
    println!("Report 1: Transaction Dynamics by Quarter and Category\n");
    output::preview_pivot(&r1);
    println!("(Full table exported to {})\n", file1.display());

    let r2 = dashboard.device_engagement_by_brand(&state);
    let file2 = out.join("report2_device_engagement.csv");
    output::write_csv(&file2, &r2)?;
    println!("Report 2: Device Dominance and User Engagement\n");
    output::preview_table_rows(&r2, 5);
    println!("(Full table exported to {})\n", file2.display());

    let r3 = dashboard.insurance_by_year(&state);
    let file3 = out.join("report3_insurance_penetration.csv");
    output::write_csv(&file3, &r3)?;
    println!("Report 3: Insurance Penetration by Year\n");
    output::preview_table_rows(&r3, 5);
    println!("(Full table exported to {})\n", file3.display());

    let r4 = dashboard.top_states_by_insurance_amount(app.config.top_states);
    let file4 = out.join("report4_top_insurance_states.csv");
    output::write_csv(&file4, &r4)?;
    println!("Report 4: Top {} States by Insurance Amount\n", app.config.top_states);
    output::preview_table_rows(&r4, 3);
    println!("(Full table exported to {})\n", file4.display());

    let r5 = dashboard.user_engagement_by_year(&state);
    let file5 = out.join("report5_user_engagement.csv");
    output::write_csv(&file5, &r5)?;
    println!("Report 5: User Engagement by Year\n");
    output::preview_table_rows(&r5, 5);
    println!("(Full table exported to {})\n", file5.display());

    let r6 = dashboard.statewise_transaction_totals();
    let file6 = out.join("report6_statewise_transactions.csv");
    output::write_csv(&file6, &r6)?;
    println!("Report 6: Statewise Transaction Totals (map data)\n");
    output::preview_table_rows(&r6, 3);
    println!("(Full table exported to {})\n", file6.display());

    let summary = reports::dashboard_summary(dashboard.data(), &state, year);
    output::write_json(&out.join("summary.json"), &summary)?;
    println!("Summary Stats (summary.json):");
    println!(
        "{{\"total_transaction_amount\": {}, \"total_premium\": {}}}\n",
        format_number(summary.total_transaction_amount, 2),
        format_number(summary.total_premium, 2)
    );
    let stats = dashboard.cache_stats();
    log::debug!("report cache: {} hits, {} misses", stats.hits, stats.misses);
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = Config::from_args(&args);
    log::info!("using data directory {}", config.data_dir.display());
    let mut app = App {
        state: config.state.clone(),
        year: config.year,
        config,
        dashboard: None,
    };

    loop {
        println!("PhonePe Data Insights:");
        println!("[1] Load fact tables");
        println!("[2] Select state and year");
        println!("[3] Generate reports\n");
        match read_line("Enter choice: ").as_str() {
            "1" => handle_load(&mut app),
            "2" => handle_select(&mut app),
            "3" => {
                println!("");
                if let Err(e) = handle_generate_reports(&mut app) {
                    log::error!("report generation failed: {}", e);
                    eprintln!("Write error: {}", e);
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}

use std::fs;
use std::io;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use kamtrack::args::{Args, Command};
use kamtrack::config::Config;
use kamtrack::sales::record::{Branch, NewCustomer};
use kamtrack::tracker::{AddOutcome, Tracker, UpdateOutcome};
use kamtrack::{data, export, report};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = Config::from(&args);
    let mut tracker = Tracker::new(config.store());
    let now = Local::now().naive_local();

    match args.command {
        Command::Add {
            branch,
            customer,
            prior,
            current,
            notes,
        } => {
            let input = NewCustomer {
                branch,
                customer,
                prior_year_sales: prior,
                current_sales: current,
                notes,
            };
            match tracker.add_customer(input, now)? {
                AddOutcome::Added(record) => println!("Dodano klienta {}", record.customer()),
                AddOutcome::Ignored => eprintln!("Nazwa klienta jest pusta, nic nie dodano."),
            }
        },
        Command::Update {
            branch,
            customer,
            current,
            note,
        } => match tracker.update_customer(branch, &customer, current, &note, now)? {
            UpdateOutcome::Updated(_) => println!("Zaktualizowano!"),
            UpdateOutcome::NoCustomers(branch) => eprintln!("Brak klientów w oddziale {}.", branch),
            UpdateOutcome::NotFound { branch, customer } => {
                eprintln!("Klient {} nie istnieje w oddziale {}, nic nie zmieniono.", customer, branch)
            },
        },
        Command::Customers { branch } => {
            let table = tracker.table();
            for customer in table.customers(branch) {
                if let Some(record) = table.find(branch, customer) {
                    println!("{}\t{}", customer, report::format_amount(record.current_sales()));
                }
            }
        },
        Command::Branches => {
            for branch in Branch::ALL {
                println!("{}", branch);
            }
        },
        Command::Dashboard => print!("{}", report::render_dashboard(&tracker.table())),
        Command::Table => {
            let table = tracker.table();
            data::write_rows(io::stdout(), table.newest_first().into_iter())?;
        },
        Command::Export { .. } => {
            let bytes = export::to_xlsx(&tracker.table())?;
            let path = config.export_path(&export::file_name(now.date()));
            fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
            println!("{}", path.display());
        },
    }

    Ok(())
}

use crate::ShockTube::task_parser_shock::{PlanTask, SHOCK_PLAN_TEMPLATE};
use crate::cli::shock_help::SHOCK_ENG_HELPER;
use prettytable::{Cell, Row, Table};
use std::io::{self, Write};

pub fn plan_menu() {
    loop {
        println!("\n=== Experiment Planning ===");
        println!("1. Plan from a task file");
        println!("2. Plan from the built-in template task");
        println!("3. Show the task file format help");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        io::stdout().flush().unwrap();

        let choice = get_user_input();
        match choice.trim() {
            "1" => {
                print!("Path to task file: ");
                io::stdout().flush().unwrap();
                let path = get_user_input();
                match PlanTask::from_file(path.trim()) {
                    Ok(task) => run_and_print(&task),
                    Err(e) => println!("Failed to load task: {}", e),
                }
            }
            "2" => match PlanTask::from_str_task(SHOCK_PLAN_TEMPLATE) {
                Ok(task) => run_and_print(&task),
                Err(e) => println!("Failed to parse template: {}", e),
            },
            "3" => println!("{}", SHOCK_ENG_HELPER),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn run_and_print(task: &PlanTask) {
    match task.run() {
        Ok((conditions, p4)) => {
            let mut table = Table::new();
            table.add_row(Row::new(vec![Cell::new("quantity"), Cell::new("value")]));
            table.add_row(Row::new(vec![
                Cell::new("driven gas"),
                Cell::new(&format!("{}", task.mixture)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("gamma"),
                Cell::new(&format!("{:.4}", conditions.gamma)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("Ms"),
                Cell::new(&format!("{:.4}", conditions.Ms)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("shock speed W, m/s"),
                Cell::new(&format!("{:.1}", conditions.W)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("fill pressure P1, Pa"),
                Cell::new(&format!("{:.1}", conditions.P1)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("T2, K"),
                Cell::new(&format!("{:.1}", conditions.T2)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("P2, Pa"),
                Cell::new(&format!("{:.1}", conditions.P2)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("U2, m/s"),
                Cell::new(&format!("{:.1}", conditions.U2)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("T5, K"),
                Cell::new(&format!("{:.1}", conditions.T5)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("P5, Pa"),
                Cell::new(&format!("{:.1}", conditions.P5)),
            ]));
            if let Some(p4) = p4 {
                table.add_row(Row::new(vec![
                    Cell::new("driver pressure P4, Pa"),
                    Cell::new(&format!("{:.1}", p4)),
                ]));
            }
            table.printstd();
        }
        Err(e) => println!("Planning failed: {}", e),
    }
}

fn get_user_input() -> String {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .expect("Failed to read input");
    input
}

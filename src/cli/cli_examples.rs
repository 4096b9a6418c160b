use crate::Examples::kinetics_examples::kin_examples;
use crate::Examples::shock_examples::shock_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Mixtures and molar masses");
        println!("2. Batch reactor with ignition delay");
        println!("3. Parameter study and IDT plot");
        println!("4. Experiment planning");
        println!("5. Driver pressure sweep");
        println!("6. Task file pipeline");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        io::stdout().flush().unwrap();

        let choice = get_user_input();
        match choice.trim() {
            "1" => kin_examples(0),
            "2" => kin_examples(1),
            "3" => kin_examples(2),
            "4" => shock_examples(0),
            "5" => shock_examples(1),
            "6" => shock_examples(2),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn get_user_input() -> String {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .expect("Failed to read input");
    input
}

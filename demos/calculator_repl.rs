use calculator_rs::{Calculator, KEYPAD};
use std::io::{BufRead, Write};

fn main() {
    pretty_env_logger::init();

    let mut calculator = Calculator::default();

    println!("calculator REPL, keys: {} ( ) <", KEYPAD.join(" "));
    println!("{}", calculator.display());

    let stdin = std::io::stdin();
    loop {
        print!("\x1b[0;36m > \x1b[0;0m");
        if std::io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        if let Err(c) = calculator.input(&line) {
            println!("unknown key '{}'", c);
        }
        println!("{}", calculator.display());
    }
}

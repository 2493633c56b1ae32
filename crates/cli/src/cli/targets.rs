use routebind_core::Target;

pub fn run() -> i32 {
    for target in Target::ALL {
        println!("{:<16} {}", target.name(), target.description());
    }
    0
}

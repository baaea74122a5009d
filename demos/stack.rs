//! Runs the stack scenario end to end against the real allocator: push
//! `0..9`, read them back from the top, pop five, read the remainder.

fn main() {
    env_logger::init();

    buddyheap::init().expect("init allocator");

    let mut stack = buddyheap::Stack::new();
    for value in 0..10 {
        stack.push(value).expect("push");
    }

    print!("top to bottom:");
    for i in 0..stack.len() {
        print!(" {}", stack.get(i).unwrap());
    }
    println!();

    for _ in 0..5 {
        let popped = stack.pop().expect("pop");
        println!("popped {popped}");
    }

    print!("remaining:");
    for i in 0..stack.len() {
        print!(" {}", stack.get(i).unwrap());
    }
    println!();

    drop(stack);
    buddyheap::destroy().expect("destroy allocator");
}

#[inline(never)]
pub fn header_fn2(x: i32) {
    println!("header_fn2({x})"); // #BPH2
}

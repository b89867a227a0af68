//! Shares its file name with `dir2/debuggee.rs`; breakpoints set by file name
//! must resolve to the right one.

#[inline(never)]
pub fn header_fn1(x: i32) {
    println!("header_fn1({x})"); // #BPH1
}

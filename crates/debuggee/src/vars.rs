//! Locals for variable-view and formatter tests.
//!
//! [`build_and_hold`] rebuilds the whole set every iteration and parks on one
//! marked line (`#BP3`) with all of it alive; nothing is consumed, and the only
//! value that survives an iteration is the process-wide counter.

#![allow(clippy::approx_constant)]

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::ffi::{c_void, CStr};
use std::hint::black_box;
use std::ptr;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

pub const SCENARIO_ITERATIONS: u32 = 10;

/// Address used for pointers that must be non-null yet never valid.
pub const INVALID_ADDRESS: usize = 1;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Struct {
    pub a: i32,
    pub b: u8,
    pub c: f32,
    pub d: [i32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct DeepStruct {
    pub a: i32,
    pub b: &'static str,
    pub c: f32,
    pub d: Struct,
    pub e: [Struct; 5],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub union XW {
    pub x: i32,
    pub w: i32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub union YH {
    pub y: i32,
    pub h: i32,
}

/// Two overlapping field pairs, the way a C struct of anonymous unions lays out.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AnonUnion {
    pub xw: XW,
    pub yh: YH,
}

#[derive(Debug)]
pub struct TupleStruct<'a>(pub i32, pub &'a str, pub f32);

/// What a debugger can ask of any object in the class hierarchy, whatever its
/// concrete variant.
pub trait ClassObject {
    fn identity(&self) -> &'static str;
    /// Invalidate the fields. Runs on drop, so a debugger stepping through
    /// destruction sees them change.
    fn teardown(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Base {
    pub m1: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub base: Base,
    pub m2: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Class {
    Base(Base),
    Derived(Derived),
}

impl Class {
    /// Class-level constant, readable as `Class::MS` from a debugger.
    pub const MS: i32 = 42;

    pub fn base() -> Self {
        Class::Base(Base { m1: 1 })
    }

    pub fn derived() -> Self {
        Class::Derived(Derived {
            base: Base { m1: 1 },
            m2: 2,
        })
    }
}

impl ClassObject for Class {
    fn identity(&self) -> &'static str {
        match self {
            Class::Base(_) => "Class",
            Class::Derived(_) => "DerivedClass",
        }
    }

    fn teardown(&mut self) {
        match self {
            Class::Base(b) => b.m1 = 0,
            Class::Derived(d) => {
                d.m2 = 0;
                d.base.m1 = 0;
            }
        }
    }
}

impl Drop for Class {
    fn drop(&mut self) {
        self.teardown();
    }
}

// One per process. Only the thread running the scenario writes it: bumped once
// per iteration, never reset.
static ITERATION_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn iteration_count() -> u32 {
    ITERATION_COUNTER.load(Ordering::Relaxed)
}

/// Run `iterations` rounds and return the counter afterwards. In a fresh
/// process the result equals `iterations`.
#[inline(never)]
pub fn build_and_hold(iterations: u32) -> u32 {
    let a = 10;
    let b = 20;
    black_box((a, b));

    for j in 0..iterations {
        let i = j as i32;
        let a = 30;
        let b = 40;
        let pi: f32 = 3.141_592_7;
        let static_ = ITERATION_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;

        let c: &[u8; 7] = b"foobar\0";
        let c2: [u8; 6] = *b"FooBar";
        let large_array = [0i32; 100_000];
        let array_int = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let array_int_ptr: *const i32 = array_int.as_ptr();
        let vec_int = vec![vec![i, i * 2, i * 3, i * 4, i * 5]; 10];
        let empty_vec: Vec<Vec<i32>> = Vec::new();

        let s1 = Struct {
            a: i + 1,
            b: b'a',
            c: 3.0,
            d: [i; 4],
        };
        let s2 = Struct {
            a: i + 10,
            b: b'b',
            c: 999.0,
            d: [i * 10; 4],
        };
        let s_ptr: *const Struct = &s1;
        let s_ref: &Struct = &s1;
        let s_ptr_ptr: *const *const Struct = &s_ptr;
        let s_box: Box<Struct> = Box::new(s2);
        let null_s_ptr: *const Struct = ptr::null();
        let null_s_ptr_ptr: *const *const Struct = &null_s_ptr;
        let invalid_s_ptr = INVALID_ADDRESS as *const Struct;
        let dangling_s_ptr: *const Struct = {
            let gone = Box::new(s1);
            &*gone as *const Struct
        };
        let void_ptr: *const c_void = s_ptr.cast();
        let null_void_ptr: *const c_void = ptr::null();
        let invalid_void_ptr = INVALID_ADDRESS as *const c_void;

        let anon_union = AnonUnion {
            xw: XW { x: 4 },
            yh: YH { y: 5 },
        };
        let mut ds1 = DeepStruct {
            a: 13,
            b: "foo",
            c: 3.14,
            d: Struct {
                a: i,
                b: b'd',
                c: 4.0,
                d: [1, 2, 3, i],
            },
            e: [Struct::default(); 5],
        };
        ds1.e[0] = Struct {
            a: i * 2,
            b: b's',
            c: 5.0,
            d: [4, 5, 6, i],
        };
        ds1.e[1] = Struct {
            a: i * 3,
            b: b'x',
            c: 5.5,
            d: [3, 5, 1, i],
        };

        let class_obj = Class::base();
        let derived_class_obj = Class::derived();
        let class_ptr: &dyn ClassObject = &derived_class_obj;

        let vec_struct = vec![
            Struct {
                a: i * 2,
                b: b'b',
                c: 4.0,
                d: [0; 4],
            };
            3
        ];
        let stdarr_int = [0i32; 5];
        let ord_map = BTreeMap::from([(1, 2.34f32), (2, 3.56f32)]);
        let unord_map = HashMap::from([(1, 2.34f32), (2, 3.56f32)]);
        let shared_ptr = Rc::new(ord_map.clone());
        let shared_weak = Rc::downgrade(&shared_ptr);

        let mut array_struct = [Struct::default(); 5];
        for (k, slot) in array_struct.iter_mut().enumerate() {
            let k = k as i32;
            *slot = Struct {
                a: i * 2 + k,
                b: b'a' + k as u8,
                c: k as f32,
                d: [0; 4],
            };
        }
        let array_struct_p: *const Struct = array_struct.as_ptr();

        let cstr: &CStr = c"The quick brown fox";
        let wcstr: Vec<u16> = "The quick brown fox"
            .encode_utf16()
            .chain(Some(0))
            .collect();
        let str1 = String::from("The quick brown fox");
        let invalid_utf8: &CStr = c"ABC\xFF\x01\xFEXYZ";
        let invalid_utf8_bytes: &[u8] = b"ABC\xFF\x01\xFEXYZ";
        let empty_str = String::new();
        let str_ptr: *const String = &str1;
        let str_ref: &String = &str1;
        let wstr1: Vec<char> = "Превед йожэг!".chars().collect();
        let wstr2: Vec<u16> = "Ḥ̪͔̦̺E͍̹̯̭͜ C̨͙̹̖̙O̡͍̪͖ͅM̢̗͙̫̬E̜͍̟̟̮S̢̢̪̘̦!".encode_utf16().collect();

        let opt_str1: Option<&str> = Some("string");
        let opt_str2: Option<&str> = None;
        let result_ok: Result<&str, String> = Ok("ok");
        let result_err: Result<&str, String> = Err("err".into());
        let cow1: Cow<'_, str> = Cow::Borrowed("their cow");
        let cow2: Cow<'_, str> = Cow::Owned("my cow".into());
        let tuple = (1, "a", 42.0);
        let tuple_struct = TupleStruct(3, "xxx", -3.0);
        let cell = Cell::new(10);
        let ref_cell = RefCell::new(11);
        let ref_cell_borrow = ref_cell.borrow();

        let zzz = i; // #BP3

        black_box((
            (i, a, b, pi, static_, c, &c2, &large_array),
            (&array_int, array_int_ptr, &vec_int, &empty_vec),
            (&s1, &s2, s_ptr, s_ref, s_ptr_ptr, &s_box),
            (null_s_ptr, null_s_ptr_ptr, invalid_s_ptr, dangling_s_ptr),
            (void_ptr, null_void_ptr, invalid_void_ptr),
            (&anon_union, &ds1, &class_obj, class_ptr),
            (&vec_struct, &stdarr_int, &ord_map, &unord_map),
            (&shared_ptr, &shared_weak, &array_struct, array_struct_p),
            (cstr, &wcstr, &str1, invalid_utf8, invalid_utf8_bytes),
            (&empty_str, str_ptr, str_ref, &wstr1, &wstr2),
            (&opt_str1, &opt_str2, &result_ok, &result_err, &cow1, &cow2),
            (&tuple, &tuple_struct, &cell, &ref_cell_borrow, zzz),
        ));
    }

    iteration_count()
}

/// Grow one vector by one element per iteration, parking on `#BP4` each time so
/// a debugger can watch a single variable change.
#[inline(never)]
pub fn build_and_update(iterations: u32) -> Vec<u32> {
    let mut vector = Vec::new();
    for i in 0..iterations {
        vector.push(i);
        let zzz = i; // #BP4
        black_box((&vector, zzz));
    }
    vector
}

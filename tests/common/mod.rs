#![allow(dead_code)]

use std::fs;
use std::path::Path;

const EHDR_SIZE: usize = 64;
const PHDR_SIZE: usize = 56;
const DYN_SIZE: usize = 16;

const PT_LOAD: u32 = 1;
const PT_DYNAMIC: u32 = 2;
const DT_NULL: u64 = 0;
const DT_NEEDED: u64 = 1;
const DT_STRTAB: u64 = 5;
const DT_STRSZ: u64 = 10;

/// Minimal little-endian ELF64 shared object whose dynamic section lists `needed`
/// as DT_NEEDED entries, in order. One PT_LOAD maps the whole file at vaddr 0,
/// so virtual addresses equal file offsets.
pub fn elf_shared_object(needed: &[&str]) -> Vec<u8> {
    let strtab_off = EHDR_SIZE + 2 * PHDR_SIZE;
    let mut strtab = vec![0u8];
    let mut name_offsets = Vec::new();
    for name in needed {
        name_offsets.push(strtab.len() as u64);
        strtab.extend_from_slice(name.as_bytes());
        strtab.push(0);
    }
    let dyn_off = (strtab_off + strtab.len() + 7) & !7;
    let dyn_count = needed.len() + 3;
    let total = dyn_off + dyn_count * DYN_SIZE;

    let mut out = Vec::with_capacity(total);
    // e_ident
    out.extend_from_slice(&[0x7f, b'E', b'L', b'F', 2, 1, 1, 0]);
    out.extend_from_slice(&[0u8; 8]);
    push_u16(&mut out, 3); // ET_DYN
    push_u16(&mut out, 62); // EM_X86_64
    push_u32(&mut out, 1);
    push_u64(&mut out, 0); // e_entry
    push_u64(&mut out, EHDR_SIZE as u64); // e_phoff
    push_u64(&mut out, 0); // e_shoff
    push_u32(&mut out, 0); // e_flags
    push_u16(&mut out, EHDR_SIZE as u16);
    push_u16(&mut out, PHDR_SIZE as u16);
    push_u16(&mut out, 2); // e_phnum
    push_u16(&mut out, 64); // e_shentsize
    push_u16(&mut out, 0); // e_shnum
    push_u16(&mut out, 0); // e_shstrndx

    push_phdr(&mut out, PT_LOAD, 4, 0, total as u64, 0x1000);
    push_phdr(&mut out, PT_DYNAMIC, 6, dyn_off as u64, (dyn_count * DYN_SIZE) as u64, 8);

    out.extend_from_slice(&strtab);
    out.resize(dyn_off, 0);

    for off in name_offsets {
        push_dyn(&mut out, DT_NEEDED, off);
    }
    push_dyn(&mut out, DT_STRTAB, strtab_off as u64);
    push_dyn(&mut out, DT_STRSZ, strtab.len() as u64);
    push_dyn(&mut out, DT_NULL, 0);
    debug_assert_eq!(out.len(), total);
    out
}

/// Write a fixture library named `name` into `dir`.
pub fn write_library(dir: &Path, name: &str, needed: &[&str]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, elf_shared_object(needed)).unwrap();
}

/// a.so -> b.so -> c.so, plus a standalone d.so.
pub fn chain_fixture(dir: &Path) {
    write_library(dir, "a.so", &["b.so"]);
    write_library(dir, "b.so", &["c.so"]);
    write_library(dir, "c.so", &[]);
    write_library(dir, "d.so", &[]);
}

fn push_phdr(out: &mut Vec<u8>, p_type: u32, flags: u32, offset: u64, size: u64, align: u64) {
    push_u32(out, p_type);
    push_u32(out, flags);
    push_u64(out, offset); // p_offset
    push_u64(out, offset); // p_vaddr
    push_u64(out, offset); // p_paddr
    push_u64(out, size); // p_filesz
    push_u64(out, size); // p_memsz
    push_u64(out, align);
}

fn push_dyn(out: &mut Vec<u8>, tag: u64, val: u64) {
    push_u64(out, tag);
    push_u64(out, val);
}

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

// @generated by proto-static from person.schema.json; do not edit.

use proto_static::rt::{self, Reader, Writer};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person<const B_NAME: usize, const A_TAGS: usize> {
    pub id: i32,
    pub name: rt::FixedString<B_NAME>,
    pub tags: rt::FixedVec<u32, A_TAGS>,
}

impl<const B_NAME: usize, const A_TAGS: usize> Person<B_NAME, A_TAGS> {
    pub fn decode(&mut self, r: &mut Reader<'_>) {
        while !r.at_end() {
            let key = r.uvar();
            let field = (key >> 3) as u32;
            match key & 7 {
                5 => {
                    r.skip(4);
                }
                1 => {
                    r.skip(8);
                }
                0 => {
                    match field {
                        1 => {
                            self.id = r.uvar() as i32;
                        }
                        _ => {
                            r.uvar();
                        }
                    }
                }
                2 => {
                    let len = r.uvar() as usize;
                    let end = r.mark(len);
                    match field {
                        2 => {
                            r.read_str(len, &mut self.name);
                        }
                        3 => {
                            while !r.done(end) && !self.tags.is_full() {
                                self.tags.push(r.uvar() as u32);
                            }
                        }
                        _ => {}
                    }
                    r.seek(end);
                }
                _ => {
                    return;
                }
            }
        }
    }

    pub fn size(&self) -> usize {
        let mut size = 0;
        if self.id != 0 {
            size += 1 + rt::uvar_size(self.id as u32 as u64);
        }
        if !self.name.is_empty() {
            size += 1 + rt::uvar_size(self.name.len() as u64) + self.name.len();
        }
        if !self.tags.is_empty() {
            let mut s = 0;
            for v in self.tags.iter() {
                s += rt::uvar_size(*v as u64);
            }
            size += 1 + rt::uvar_size(s as u64) + s;
        }
        size
    }

    pub fn encode(&self, w: &mut Writer<'_>) {
        if self.id != 0 {
            w.uvar(8);
            w.uvar(self.id as u32 as u64);
        }
        if !self.name.is_empty() {
            w.uvar(18);
            w.uvar(self.name.len() as u64);
            w.bytes(self.name.as_bytes());
        }
        if !self.tags.is_empty() {
            let mut s = 0;
            for v in self.tags.iter() {
                s += rt::uvar_size(*v as u64);
            }
            w.uvar(26);
            w.uvar(s as u64);
            for v in self.tags.iter() {
                w.uvar(*v as u64);
            }
        }
    }
}

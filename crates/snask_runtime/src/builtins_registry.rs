use snask_core::Value;
use snask_core::object::{FastHashMap, fast_map_new};

use super::Runtime;
use super::builtins;

/// Native operation. `Err` carries a diagnostic; callers at the value
/// boundary see `Nil`.
pub type BuiltinFn = fn(&Runtime, &[Value]) -> Result<Value, String>;

pub struct BuiltinRegistry {
    entries: Vec<(String, BuiltinFn)>,
    index: FastHashMap<String, usize>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: fast_map_new(),
        }
    }

    /// Adds `name`, replacing an earlier registration of the same name.
    pub fn register(&mut self, name: &str, fun: BuiltinFn) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 = fun,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), fun));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.index.get(name).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub trait BuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry);
}

pub struct StdBuiltinProvider;

impl BuiltinProvider for StdBuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry) {
        // io
        registry.register("print", builtins::builtin_print);
        registry.register("println", builtins::builtin_println);
        // strings and numbers
        registry.register("len", builtins::builtin_len);
        registry.register("upper", builtins::builtin_upper);
        registry.register("lower", builtins::builtin_lower);
        registry.register("concat", builtins::builtin_concat);
        registry.register("str_to_num", builtins::builtin_str_to_num);
        registry.register("num_to_str", builtins::builtin_num_to_str);
        registry.register("abs", builtins::builtin_abs);
        registry.register("max", builtins::builtin_max);
        registry.register("min", builtins::builtin_min);
        registry.register("is_nil", builtins::builtin_is_nil);
        registry.register("is_str", builtins::builtin_is_str);
        registry.register("is_obj", builtins::builtin_is_obj);
        // filesystem
        registry.register("sfs_read", builtins::builtin_sfs_read);
        registry.register("sfs_write", builtins::builtin_sfs_write);
        registry.register("sfs_append", builtins::builtin_sfs_append);
        registry.register("sfs_delete", builtins::builtin_sfs_delete);
        registry.register("sfs_exists", builtins::builtin_sfs_exists);
        registry.register("sfs_copy", builtins::builtin_sfs_copy);
        registry.register("sfs_move", builtins::builtin_sfs_move);
        registry.register("sfs_mkdir", builtins::builtin_sfs_mkdir);
        registry.register("sfs_rmdir", builtins::builtin_sfs_rmdir);
        registry.register("sfs_is_file", builtins::builtin_sfs_is_file);
        registry.register("sfs_is_dir", builtins::builtin_sfs_is_dir);
        registry.register("sfs_listdir", builtins::builtin_sfs_listdir);
        registry.register("sfs_size", builtins::builtin_sfs_size);
        registry.register("sfs_mtime", builtins::builtin_sfs_mtime);
        // paths
        registry.register("path_basename", builtins::builtin_path_basename);
        registry.register("path_dirname", builtins::builtin_path_dirname);
        registry.register("path_extname", builtins::builtin_path_extname);
        registry.register("path_join", builtins::builtin_path_join);
        // os
        registry.register("os_cwd", builtins::builtin_os_cwd);
        registry.register("os_platform", builtins::builtin_os_platform);
        registry.register("os_arch", builtins::builtin_os_arch);
        registry.register("os_getenv", builtins::builtin_os_getenv);
        registry.register("os_setenv", builtins::builtin_os_setenv);
        registry.register("os_random_hex", builtins::builtin_random_hex);
        registry.register("time", builtins::builtin_time);
        registry.register("sleep", builtins::builtin_sleep);
        // auth
        registry.register("auth_const_time_eq", builtins::builtin_const_time_eq);
        registry.register("auth_random_hex", builtins::builtin_random_hex);
        // json
        registry.register("json_parse", builtins::builtin_json_parse);
        registry.register("json_parse_ex", builtins::builtin_json_parse_ex);
        registry.register("json_stringify", builtins::builtin_json_stringify);
        registry.register("json_stringify_pretty", builtins::builtin_json_stringify_pretty);
        registry.register("json_get", builtins::builtin_json_get);
        registry.register("json_has", builtins::builtin_json_has);
        registry.register("json_len", builtins::builtin_json_len);
        registry.register("json_index", builtins::builtin_json_index);
        registry.register("json_set", builtins::builtin_json_set);
        registry.register("sjson_new_object", builtins::builtin_new_object);
        registry.register("sjson_new_array", builtins::builtin_new_array);
        registry.register("sjson_type", builtins::builtin_json_type);
        registry.register("sjson_arr_len", builtins::builtin_arr_len);
        registry.register("sjson_arr_get", builtins::builtin_arr_get);
        registry.register("sjson_arr_set", builtins::builtin_arr_set);
        registry.register("sjson_arr_push", builtins::builtin_arr_push);
        registry.register("sjson_path_get", builtins::builtin_path_get);
        registry.register("s_get_member", builtins::builtin_get_member);
        registry.register("s_set_member", builtins::builtin_set_member);
        registry.register("s_alloc_obj", builtins::builtin_alloc_obj);
        // http
        registry.register("blaze_qs_get", builtins::builtin_qs_get);
        registry.register("blaze_cookie_get", builtins::builtin_cookie_get);
        registry.register("blaze_run", builtins::builtin_blaze_run);
        // threads
        registry.register("thread_spawn", builtins::builtin_thread_spawn);
        registry.register("thread_join", builtins::builtin_thread_join);
        registry.register("thread_detach", builtins::builtin_thread_detach);
    }
}

//! Built-in x86_64 syscall table
//!
//! Used when no catalog file is available or `--builtin-catalog` is given.
//! `syscalls.csv` at the repository root is generated from this table.

/// `(number, name, description)` rows, ascending by number.
pub const X86_64_SYSCALLS: &[(i64, &str, &str)] = &[
    (0, "read", "read from a file descriptor"),
    (1, "write", "write to a file descriptor"),
    (2, "open", "open and possibly create a file"),
    (3, "close", "close a file descriptor"),
    (4, "stat", "get file status"),
    (5, "fstat", "get file status by descriptor"),
    (6, "lstat", "get symbolic link status"),
    (7, "poll", "wait for some event on a file descriptor"),
    (8, "lseek", "reposition read/write file offset"),
    (9, "mmap", "map files or devices into memory"),
    (10, "mprotect", "set protection on a region of memory"),
    (11, "munmap", "unmap files or devices from memory"),
    (12, "brk", "change data segment size"),
    (13, "rt_sigaction", "examine and change a signal action"),
    (14, "rt_sigprocmask", "examine and change blocked signals"),
    (15, "rt_sigreturn", "return from signal handler"),
    (16, "ioctl", "control device"),
    (17, "pread64", "read from a file descriptor at a given offset"),
    (18, "pwrite64", "write to a file descriptor at a given offset"),
    (19, "readv", "read data into multiple buffers"),
    (20, "writev", "write data from multiple buffers"),
    (21, "access", "check user's permissions for a file"),
    (22, "pipe", "create pipe"),
    (23, "select", "synchronous I/O multiplexing"),
    (24, "sched_yield", "yield the processor"),
    (25, "mremap", "remap a virtual memory address"),
    (26, "msync", "synchronize a file with a memory map"),
    (27, "mincore", "determine whether pages are resident in memory"),
    (28, "madvise", "give advice about use of memory"),
    (29, "shmget", "allocate a System V shared memory segment"),
    (30, "shmat", "attach System V shared memory"),
    (31, "shmctl", "System V shared memory control"),
    (32, "dup", "duplicate a file descriptor"),
    (33, "dup2", "duplicate a file descriptor onto another"),
    (34, "pause", "wait for signal"),
    (35, "nanosleep", "high-resolution sleep"),
    (36, "getitimer", "get value of an interval timer"),
    (37, "alarm", "set an alarm clock for delivery of a signal"),
    (38, "setitimer", "set value of an interval timer"),
    (39, "getpid", "get process identification"),
    (40, "sendfile", "transfer data between file descriptors"),
    (41, "socket", "create an endpoint for communication"),
    (42, "connect", "initiate a connection on a socket"),
    (43, "accept", "accept a connection on a socket"),
    (44, "sendto", "send a message on a socket"),
    (45, "recvfrom", "receive a message from a socket"),
    (46, "sendmsg", "send a message on a socket"),
    (47, "recvmsg", "receive a message from a socket"),
    (48, "shutdown", "shut down part of a full-duplex connection"),
    (49, "bind", "bind a name to a socket"),
    (50, "listen", "listen for connections on a socket"),
    (51, "getsockname", "get socket name"),
    (52, "getpeername", "get name of connected peer socket"),
    (53, "socketpair", "create a pair of connected sockets"),
    (54, "setsockopt", "set options on sockets"),
    (55, "getsockopt", "get options on sockets"),
    (56, "clone", "create a child process"),
    (57, "fork", "create a child process"),
    (58, "vfork", "create a child process and block parent"),
    (59, "execve", "execute program"),
    (60, "exit", "terminate the calling thread"),
    (61, "wait4", "wait for process to change state"),
    (62, "kill", "send signal to a process"),
    (63, "uname", "get name and information about current kernel"),
    (64, "semget", "get a System V semaphore set identifier"),
    (65, "semop", "System V semaphore operations"),
    (66, "semctl", "System V semaphore control operations"),
    (67, "shmdt", "detach System V shared memory"),
    (68, "msgget", "get a System V message queue identifier"),
    (69, "msgsnd", "send a System V message"),
    (70, "msgrcv", "receive a System V message"),
    (71, "msgctl", "System V message control operations"),
    (72, "fcntl", "manipulate file descriptor"),
    (73, "flock", "apply or remove an advisory lock on an open file"),
    (74, "fsync", "synchronize a file's in-core state with storage"),
    (75, "fdatasync", "synchronize a file's data with storage"),
    (76, "truncate", "truncate a file to a specified length"),
    (77, "ftruncate", "truncate an open file to a specified length"),
    (78, "getdents", "get directory entries"),
    (79, "getcwd", "get current working directory"),
    (80, "chdir", "change working directory"),
    (81, "fchdir", "change working directory by descriptor"),
    (82, "rename", "change the name or location of a file"),
    (83, "mkdir", "create a directory"),
    (84, "rmdir", "delete a directory"),
    (85, "creat", "create a file"),
    (86, "link", "make a new name for a file"),
    (87, "unlink", "delete a name and possibly the file it refers to"),
    (88, "symlink", "make a new name for a file"),
    (89, "readlink", "read value of a symbolic link"),
    (90, "chmod", "change permissions of a file"),
    (91, "fchmod", "change permissions of an open file"),
    (92, "chown", "change ownership of a file"),
    (93, "fchown", "change ownership of an open file"),
    (94, "lchown", "change ownership of a symbolic link"),
    (95, "umask", "set file mode creation mask"),
    (96, "gettimeofday", "get time"),
    (97, "getrlimit", "get resource limits"),
    (98, "getrusage", "get resource usage"),
    (99, "sysinfo", "return system information"),
    (100, "times", "get process times"),
    (101, "ptrace", "process trace"),
    (102, "getuid", "get user identity"),
    (103, "syslog", "read and/or clear kernel message ring buffer"),
    (104, "getgid", "get group identity"),
    (105, "setuid", "set user identity"),
    (106, "setgid", "set group identity"),
    (107, "geteuid", "get effective user identity"),
    (108, "getegid", "get effective group identity"),
    (109, "setpgid", "set process group"),
    (110, "getppid", "get parent process identification"),
    (111, "getpgrp", "get process group"),
    (112, "setsid", "create session and set process group ID"),
    (131, "sigaltstack", "set and/or get signal stack context"),
    (137, "statfs", "get filesystem statistics"),
    (157, "prctl", "operations on a process or thread"),
    (158, "arch_prctl", "set architecture-specific thread state"),
    (186, "gettid", "get thread identification"),
    (200, "tkill", "send a signal to a thread"),
    (201, "time", "get time in seconds"),
    (202, "futex", "fast user-space locking"),
    (204, "sched_getaffinity", "get a thread's CPU affinity mask"),
    (213, "epoll_create", "open an epoll file descriptor"),
    (217, "getdents64", "get directory entries"),
    (218, "set_tid_address", "set pointer to thread ID"),
    (228, "clock_gettime", "retrieve the time of the specified clock"),
    (230, "clock_nanosleep", "high-resolution sleep with specifiable clock"),
    (231, "exit_group", "exit all threads in a process"),
    (232, "epoll_wait", "wait for an I/O event on an epoll file descriptor"),
    (233, "epoll_ctl", "control interface for an epoll file descriptor"),
    (234, "tgkill", "send a signal to a thread in a thread group"),
    (247, "waitid", "wait for process to change state"),
    (257, "openat", "open a file relative to a directory descriptor"),
    (262, "newfstatat", "get file status relative to a directory descriptor"),
    (263, "unlinkat", "delete a name relative to a directory descriptor"),
    (270, "pselect6", "synchronous I/O multiplexing with signal mask"),
    (271, "ppoll", "wait for some event with signal mask"),
    (273, "set_robust_list", "set list of robust futexes"),
    (281, "epoll_pwait", "wait for an I/O event with signal mask"),
    (288, "accept4", "accept a connection on a socket with flags"),
    (290, "eventfd2", "create a file descriptor for event notification"),
    (291, "epoll_create1", "open an epoll file descriptor with flags"),
    (292, "dup3", "duplicate a file descriptor with flags"),
    (293, "pipe2", "create pipe with flags"),
    (302, "prlimit64", "get/set resource limits of a process"),
    (318, "getrandom", "obtain a series of random bytes"),
    (332, "statx", "get file status (extended)"),
    (334, "rseq", "restartable sequences"),
    (435, "clone3", "create a child process (extended)"),
    (439, "faccessat2", "check user's permissions relative to a directory descriptor"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn syscall_name(num: i64) -> &'static str {
        X86_64_SYSCALLS
            .binary_search_by_key(&num, |&(n, _, _)| n)
            .map(|i| X86_64_SYSCALLS[i].1)
            .unwrap_or("unknown")
    }

    #[test]
    fn test_common_syscalls() {
        assert_eq!(syscall_name(0), "read");
        assert_eq!(syscall_name(1), "write");
        assert_eq!(syscall_name(2), "open");
        assert_eq!(syscall_name(3), "close");
        assert_eq!(syscall_name(257), "openat");
    }

    #[test]
    fn test_process_identity_block() {
        assert_eq!(syscall_name(39), "getpid");
        assert_eq!(syscall_name(109), "setpgid");
        assert_eq!(syscall_name(110), "getppid");
        assert_eq!(syscall_name(111), "getpgrp");
    }

    #[test]
    fn test_unknown_syscall() {
        assert_eq!(syscall_name(9999), "unknown");
        assert_eq!(syscall_name(-1), "unknown");
    }

    #[test]
    fn test_table_sorted_and_unique() {
        assert!(X86_64_SYSCALLS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_descriptions_have_no_delimiter() {
        // syscalls.csv is generated from this table without quoting
        assert!(X86_64_SYSCALLS
            .iter()
            .all(|(_, name, desc)| !name.contains(',') && !desc.contains(',')));
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_matches_libc_numbers() {
        assert_eq!(syscall_name(libc::SYS_getppid), "getppid");
        assert_eq!(syscall_name(libc::SYS_execve), "execve");
        assert_eq!(syscall_name(libc::SYS_exit_group), "exit_group");
    }
}

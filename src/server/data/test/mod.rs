mod now_playing_message;
